pub mod generation_dto;
pub mod quiz_dto;
