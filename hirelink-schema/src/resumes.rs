use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vacancies::VacancyBriefDto;
use crate::workers::WorkerDto;
use crate::workload::Workload;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAddDto {
    pub title: String,
    pub compensation: Option<i64>,
    pub workload: Workload,
    pub worker_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDto {
    pub id: i64,
    pub title: String,
    pub compensation: Option<i64>,
    pub workload: Workload,
    pub worker_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRelDto {
    #[serde(flatten)]
    pub resume: ResumeDto,
    pub worker: WorkerDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRelVacanciesRepliedDto {
    #[serde(flatten)]
    pub resume: ResumeDto,
    pub worker: WorkerDto,
    pub vacancies_replied: Vec<VacancyBriefDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadAvgCompensationDto {
    pub workload: Workload,
    pub avg_compensation: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rel_dto_flattens_resume_fields() {
        let now = Utc::now();
        let dto = ResumeRelDto {
            resume: ResumeDto {
                id: 7,
                title: "Python Analyst".to_string(),
                compensation: Some(90_000),
                workload: Workload::Parttime,
                worker_id: 2,
                created_at: now,
                updated_at: now,
            },
            worker: WorkerDto {
                id: 2,
                username: "Volk".to_string(),
                phone: None,
            },
        };

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["workload"], json!("parttime"));
        assert_eq!(value["worker"]["username"], json!("Volk"));

        let back: ResumeRelDto = serde_json::from_value(value).unwrap();
        assert_eq!(back, dto);
    }
}
