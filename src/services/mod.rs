pub mod ai_service;
pub mod extract_service;
pub mod generation_service;
pub mod question_service;
pub mod session_service;
