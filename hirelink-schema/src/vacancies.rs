use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyAddDto {
    pub title: String,
    pub compensation: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyDto {
    pub id: i64,
    pub title: String,
    pub compensation: Option<i64>,
}

/// Vacancy loaded with only its `id` and `title` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyBriefDto {
    pub id: i64,
    pub title: String,
}
