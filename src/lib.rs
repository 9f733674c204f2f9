pub mod common;
pub mod layout_engine;
pub mod model;
pub mod script;
pub mod sys;
