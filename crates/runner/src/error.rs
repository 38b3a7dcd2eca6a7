use crate::runner::RunnerPhase;
use cubestage_render::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("cannot {operation} a runner in the {phase:?} phase")]
    InvalidPhase {
        operation: &'static str,
        phase: RunnerPhase,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}
