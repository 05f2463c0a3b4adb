// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod package_interactor;
pub mod session;

// Re-export interactors
pub use batch_interactor::BatchInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use package_interactor::{DownloadPlan, PackageInteractor, StaggeredDownload};
pub use session::{Session, SessionOptions};
