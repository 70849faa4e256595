//! Target resolution.
//!
//! Targets are not imported by path at runtime. The caller hands the runner a [`TargetResolver`], normally a
//! [`SuiteRegistry`] filled from a static registration list.

use std::fmt::Display;
use std::future::Future;

use futures::future::LocalBoxFuture;

use super::error::ResolutionError;
use super::subject::{SubjectClass, SubjectHandle, TestSubject};

/// Turns a target identifier into a subject class.
pub trait TargetResolver {
    fn resolve<'a>(&'a self, target: &'a str) -> LocalBoxFuture<'a, Result<Box<dyn SubjectClass>, ResolutionError>>;
}

type LoadFuture = LocalBoxFuture<'static, Result<Box<dyn SubjectClass>, String>>;
type Loader = Box<dyn Fn() -> LoadFuture>;

fn load_subject<S: TestSubject>() -> LoadFuture {
    Box::pin(async { Ok(Box::new(SubjectHandle::<S>::new()) as Box<dyn SubjectClass>) })
}

struct Registration {
    identifier: String,
    loader: Loader,
}

/// Ordered identifier → subject registrations.
#[derive(Default)]
pub struct SuiteRegistry {
    registrations: Vec<Registration>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register subject type `S` under `identifier`. A later registration for the same identifier wins.
    pub fn register<S: TestSubject>(&mut self, identifier: impl Into<String>) -> &mut Self {
        self.insert(identifier.into(), Box::new(load_subject::<S>))
    }

    /// Register a fallible, possibly asynchronous loader under `identifier`.
    pub fn register_loader<F, Fut, E>(&mut self, identifier: impl Into<String>, loader: F) -> &mut Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<Box<dyn SubjectClass>, E>> + 'static,
        E: Display + 'static,
    {
        self.insert(
            identifier.into(),
            Box::new(move || -> LoadFuture {
                let loading = loader();
                Box::pin(async move { loading.await.map_err(|err| err.to_string()) })
            }),
        )
    }

    fn insert(&mut self, identifier: String, loader: Loader) -> &mut Self {
        match self
            .registrations
            .iter_mut()
            .find(|registration| registration.identifier == identifier)
        {
            Some(existing) => {
                tracing::warn!(%identifier, "replacing registered test subject");
                existing.loader = loader;
            }
            None => self.registrations.push(Registration { identifier, loader }),
        }
        self
    }

    /// Registered identifiers in registration order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.registrations
            .iter()
            .map(|registration| registration.identifier.as_str())
            .collect()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.registrations
            .iter()
            .any(|registration| registration.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl TargetResolver for SuiteRegistry {
    fn resolve<'a>(&'a self, target: &'a str) -> LocalBoxFuture<'a, Result<Box<dyn SubjectClass>, ResolutionError>> {
        Box::pin(async move {
            let registration = self
                .registrations
                .iter()
                .find(|registration| registration.identifier == target)
                .ok_or_else(|| ResolutionError::NotFound {
                    target: target.to_string(),
                })?;
            (registration.loader)().await.map_err(|reason| ResolutionError::Load {
                target: target.to_string(),
                reason,
            })
        })
    }
}
