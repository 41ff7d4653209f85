pub mod journals;
pub mod run;
