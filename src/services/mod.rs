pub mod grading_service;
pub mod quiz_service;
pub mod session_service;
pub mod submission_service;
