use std::{any::Any, fmt, rc::Rc};

/// Opaque capability token for a UI-framework error adapter.
///
/// The orchestrator never looks inside the token; it only forwards it to the
/// [`FrameworkCapture`](crate::FrameworkCapture) collaborator, which can
/// downcast it back to whatever the adapter needs (an app handle, a hook
/// registration function, ...).
///
/// Two hooks are equal only if they share the same token allocation.
///
/// ```rust
/// use client_monitor::FrameworkHook;
///
/// struct App { name: &'static str }
///
/// let hook = FrameworkHook::with_token("vue", App { name: "shop" });
/// assert_eq!(hook.name(), "vue");
/// assert_eq!(hook.token::<App>().map(|a| a.name), Some("shop"));
/// assert_eq!(hook, hook.clone());
/// ```
#[derive(Clone)]
pub struct FrameworkHook {
    name: Rc<str>,
    token: Rc<dyn Any>,
}

impl FrameworkHook {
    /// A hook that carries no payload beyond its name.
    pub fn new(name: &str) -> Self {
        Self::with_token(name, ())
    }

    pub fn with_token<T: Any>(name: &str, token: T) -> Self {
        Self {
            name: Rc::from(name),
            token: Rc::new(token),
        }
    }

    /// Returns the framework name this hook was created with.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the token if it is of type `T`.
    pub fn token<T: Any>(&self) -> Option<&T> {
        self.token.downcast_ref::<T>()
    }
}

impl PartialEq for FrameworkHook {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.token, &other.token)
    }
}

impl Eq for FrameworkHook {}

impl fmt::Debug for FrameworkHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkHook")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Whether a framework error adapter is wanted.
///
/// [`Framework::None`] skips the adapter entirely; it is not a disabled
/// adapter, the collaborator is simply never called.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Framework {
    #[default]
    None,
    Hook(FrameworkHook),
}

impl Framework {
    /// Returns the hook, if one is installed.
    pub fn hook(&self) -> Option<&FrameworkHook> {
        match self {
            Framework::None => None,
            Framework::Hook(hook) => Some(hook),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Framework::None)
    }
}

impl From<FrameworkHook> for Framework {
    fn from(hook: FrameworkHook) -> Self {
        Framework::Hook(hook)
    }
}
