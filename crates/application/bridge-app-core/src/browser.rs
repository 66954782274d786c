//! Resolves the current frame against the configured views and global
//! context providers.

use std::collections::HashMap;
use std::sync::Arc;

use bridge_core::{Frame, FrameId, Props};

pub type ViewFn<R> = Arc<dyn Fn(&Props) -> R + Send + Sync>;

pub struct BrowserConfig<R> {
    views: HashMap<String, ViewFn<R>>,
    /// Provider names, innermost first.
    context_providers: Vec<String>,
    fallback: Option<ViewFn<R>>,
}

/// What the view layer should mount for a frame.
pub enum RenderPlan<R> {
    View {
        /// Re-mount key; changes whenever a new frame is created.
        key: FrameId,
        element: R,
        /// `(provider, value)` pairs in wrapping order.
        contexts: Vec<(String, serde_json::Value)>,
    },
    UnknownView {
        name: String,
    },
}

impl<R> BrowserConfig<R> {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
            context_providers: Vec::new(),
            fallback: None,
        }
    }

    pub fn view(
        mut self,
        name: impl Into<String>,
        view: impl Fn(&Props) -> R + Send + Sync + 'static,
    ) -> Self {
        self.views.insert(name.into(), Arc::new(view));
        self
    }

    pub fn context_provider(mut self, name: impl Into<String>) -> Self {
        self.context_providers.push(name.into());
        self
    }

    /// View used for names that are not registered.
    pub fn fallback(mut self, view: impl Fn(&Props) -> R + Send + Sync + 'static) -> Self {
        self.fallback = Some(Arc::new(view));
        self
    }

    pub fn render(&self, frame: &Frame) -> RenderPlan<R> {
        let Some(view) = self.views.get(&frame.view).or(self.fallback.as_ref()) else {
            return RenderPlan::UnknownView {
                name: frame.view.clone(),
            };
        };

        RenderPlan::View {
            key: frame.id,
            element: view(&frame.props),
            contexts: self
                .context_providers
                .iter()
                .map(|name| (name.clone(), frame.context_value(name)))
                .collect(),
        }
    }
}

impl<R> Default for BrowserConfig<R> {
    fn default() -> Self {
        Self::new()
    }
}
