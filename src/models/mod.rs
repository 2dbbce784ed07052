pub mod batch;
pub mod form;
pub mod loaders;
pub mod metric;
pub mod numeric;

pub use batch::{Batch, BatchDraft, BatchPatch, Metrics};
pub use form::BatchForm;
pub use loaders::{load_all_batch_forms, load_batch_form, load_form_fields, LoadedForm};
pub use metric::{MetricField, MetricKind, Reference};
