pub mod archive;
pub mod backup;
pub mod clock;
pub mod history;
pub mod log;
pub mod meals;
pub mod scheduler;
pub mod today;
