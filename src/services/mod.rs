pub mod clock;
pub mod id_gen;
pub mod quality;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use id_gen::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use quality::{
    evaluate, price_deduction, quality_class, total_defects, MetricSource, QualityClass,
    QualityReport,
};
pub use store::BatchStore;
