pub mod command_dto;
pub mod result_dto;
pub mod submission_dto;
