use std::{
    cell::{Ref, RefCell},
    time::{Duration, Instant},
};

use log::info;
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    step::{Step, StepExecution},
};

/// Type alias for job execution results.
type JobResult<T> = Result<T, BatchError>;

/// Represents a job that can be executed.
///
/// A job is a container for a sequence of steps executed in order; it
/// orchestrates the steps and reports the overall result.
pub trait Job {
    /// Runs the job and returns the result of the job execution.
    fn run(&self) -> JobResult<JobExecution>;
}

/// Timing information about one job run.
#[derive(Debug)]
pub struct JobExecution {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
}

/// A configured job: a unique identifier, a name, and the steps to execute.
pub struct JobInstance<'a> {
    id: Uuid,
    name: String,
    steps: Vec<&'a dyn Step>,
    step_executions: RefCell<Vec<StepExecution>>,
}

impl JobInstance<'_> {
    /// Returns the recorded execution of the named step, if it ran.
    pub fn get_step_execution(&self, step_name: &str) -> Option<Ref<'_, StepExecution>> {
        let step_executions = self.step_executions.borrow();
        Ref::filter_map(step_executions, |executions| {
            executions
                .iter()
                .find(|execution| execution.name == step_name)
        })
        .ok()
    }
}

impl Job for JobInstance<'_> {
    /// Runs the steps in sequence. The first failing step aborts the job;
    /// its execution is still recorded.
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();

        info!("Start of job: {}, id: {}", self.name, self.id);

        for step in &self.steps {
            let mut step_execution = StepExecution::new(step.get_name());
            let result = step.execute(&mut step_execution);

            self.step_executions.borrow_mut().push(step_execution);

            if result.is_err() {
                return Err(BatchError::Step(step.get_name().to_owned()));
            }
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        Ok(JobExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
        })
    }
}

/// Builder for creating a job instance.
#[derive(Default)]
pub struct JobBuilder<'a> {
    name: Option<String>,
    steps: Vec<&'a dyn Step>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
        }
    }

    /// Sets the name of the job. A random name is generated otherwise.
    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Adds a step to the job. Steps run in the order they were added.
    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
            step_executions: RefCell::new(Vec::new()),
        }
    }
}
