//! Step wrappers that fix, at the point a step is declared, whether its
//! failure stops the workflow.

use anyhow::Error;
use std::fmt::Display;
use std::future::Future;

use crate::logging::log_step_failure;

/// A step whose failure aborts the workflow.
#[derive(Debug, Clone, Copy)]
pub struct Required {
    pub name: &'static str,
}

impl Required {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub async fn run<T, E, F>(&self, step: F) -> anyhow::Result<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<Error>,
    {
        step.await
            .map_err(|e| e.into().context(format!("{} failed", self.name)))
    }
}

/// A step whose failure is logged and otherwise ignored.
#[derive(Debug, Clone, Copy)]
pub struct BestEffort {
    pub name: &'static str,
}

impl BestEffort {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub async fn run<T, E, F>(&self, step: F) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        match step.await {
            Ok(value) => Some(value),
            Err(e) => {
                log_step_failure(self.name, &e);
                None
            }
        }
    }
}
