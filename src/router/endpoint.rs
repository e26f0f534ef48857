use std::sync::Arc;

/// What a route resolves to: the handler plus the metadata the serving layer
/// needs alongside it.
#[derive(Debug, Clone)]
pub struct Endpoint<H> {
    /// Caller-defined handler value (function pointer, channel, boxed service...).
    pub handler: H,
    /// Stable identifier used for introspection and reverse routing.
    pub handler_name: Arc<str>,
    /// Sub-router that owns this route, e.g. a virtual host. Carried, never interpreted.
    pub owner: Option<Arc<str>>,
    /// Route serves files from disk.
    pub file_server: bool,
}

impl<H> Endpoint<H> {
    pub fn new(handler_name: impl Into<Arc<str>>, handler: H) -> Self {
        Self {
            handler,
            handler_name: handler_name.into(),
            owner: None,
            file_server: false,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<Arc<str>>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn with_file_server(mut self, file_server: bool) -> Self {
        self.file_server = file_server;
        self
    }
}

/// An [`Endpoint`] as stored in a method slot, together with the route it was
/// registered under.
///
/// Route metadata lives per method rather than per node so that
/// `GET /users/:id` and `PUT /users/:user_id` keep their own capture names
/// even though they end on the same tree node.
#[derive(Debug, Clone)]
pub struct RouteEntry<H> {
    pub endpoint: Endpoint<H>,
    /// Pattern as registered (after normalisation).
    pub pattern: Arc<str>,
    /// Capture names, parallel to the values written into `Params`.
    pub param_names: Arc<[Arc<str>]>,
}
