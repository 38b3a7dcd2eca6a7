use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render surface is not attached to a container")]
    Detached,
    #[error("failed to create render surface: {0}")]
    SurfaceCreation(String),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create graphics device: {0}")]
    Device(String),
    #[error("surface error: {0}")]
    Surface(String),
}
