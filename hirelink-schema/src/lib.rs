pub mod resumes;
pub mod vacancies;
pub mod workers;
pub mod workload;

pub use resumes::{
    ResumeAddDto, ResumeDto, ResumeRelDto, ResumeRelVacanciesRepliedDto,
    WorkloadAvgCompensationDto,
};
pub use vacancies::{VacancyAddDto, VacancyBriefDto, VacancyDto};
pub use workers::{WorkerAddDto, WorkerDto, WorkerRelDto};
pub use workload::{UnknownWorkload, Workload};
