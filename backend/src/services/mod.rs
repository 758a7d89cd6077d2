//! Business logic services for the Bar Stock Tracker

pub mod alert;
pub mod analytics;
pub mod app_config;
pub mod backup;
pub mod note;
pub mod product;
pub mod purchase;
pub mod supplier;

pub use alert::AlertService;
pub use analytics::AnalyticsService;
pub use app_config::AppConfigService;
pub use backup::BackupService;
pub use note::NoteService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use supplier::SupplierService;
