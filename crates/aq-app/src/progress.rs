#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Compiling,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub tick: u64,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, t_end_s: f64, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            sim_time_s: 0.0,
            t_end_s,
            fraction_complete: if stage == RunStage::Completed { 1.0 } else { 0.0 },
            tick: 0,
            elapsed_wall_s,
            message,
        }
    }
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::Compiling => "compiling",
            RunStage::Running => "running",
            RunStage::Completed => "completed",
        }
    }
}
