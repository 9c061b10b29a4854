pub mod report;
pub mod telegram_service;
