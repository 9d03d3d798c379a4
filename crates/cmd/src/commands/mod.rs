pub mod cat;
pub mod delete;
pub mod generate;
pub mod list;
pub mod run;

pub use cat::cat_command;
pub use delete::delete_command;
pub use generate::generate_command;
pub use list::list_command;
pub use run::run_command;
