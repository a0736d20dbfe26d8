use optfig::{Bind, Binding, Field};
use serde_json::Value;

/// Server settings, filled from `host` / `port`.
#[derive(Debug, Default)]
pub struct ServerConfig {
    pub host: String,
    pub port: i64,
}

impl Bind for ServerConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::tagged("host", &mut self.host),
            Field::tagged("port", &mut self.port),
        ]
    }
}

/// Everything the demo prints.
#[derive(Debug, Default)]
pub struct DemoConfig {
    pub server: ServerConfig,
    pub tags: Vec<Value>,
    /// Live view of the `verbose` flag.
    pub verbose: Option<Binding<bool>>,
}

impl Bind for DemoConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::nested(&mut self.server),
            Field::tagged("tags", &mut self.tags),
            Field::tagged("verbose", &mut self.verbose),
        ]
    }
}
