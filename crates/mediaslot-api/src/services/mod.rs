//! Domain services behind the HTTP handlers.

pub mod logo;
pub mod slots;

pub use logo::LogoSlotManager;
pub use slots::{AssetSlotService, UploadedFile};
