pub mod toml_loader;

pub use toml_loader::{load_all_batch_forms, load_batch_form, load_form_fields, LoadedForm};
