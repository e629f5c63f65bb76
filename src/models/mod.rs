pub mod employee;
pub mod meal_record;
pub mod meal_type;
