pub mod battle;
pub mod capture;
pub mod encounter;
pub mod pokemon;
pub mod trainer;
pub mod type_data;
