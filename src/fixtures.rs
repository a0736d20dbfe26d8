#[cfg(test)]
pub mod test {
    use serde_json::Value;

    use crate::bind::{Bind, Field};
    use crate::binding::Binding;

    pub const SAMPLE_JSON: &str = r#"
        {
           "c0deum": "NSobolew",
           "Dunkon": {
              "megweg": true,
              "Bushwacker": 1,
              "mofa": {
                 "ews": "AG DobeR",
                 "ichursin": [
                    "Villian.zip"
                 ]
              }
           }
        }
    "#;

    pub const SAMPLE_TOML: &str = r#"
        tags = ["a", "b"]

        [server]
        host = "0.0.0.0"
        port = 8080
    "#;

    #[derive(Debug, Default)]
    pub struct InnerConfig {
        pub name: String,
        pub retries: i64,
    }

    impl Bind for InnerConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::tagged("test4", &mut self.name),
                Field::tagged("retries", &mut self.retries),
            ]
        }
    }

    #[derive(Debug, Default)]
    pub struct SampleConfig {
        pub items: Vec<Value>,
        pub present: bool,
        pub label: Option<Binding<String>>,
        pub untagged: String,
        pub inner: InnerConfig,
    }

    impl Bind for SampleConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::tagged("test", &mut self.items),
                Field::tagged("t2", &mut self.present),
                Field::tagged("test3", &mut self.label),
                Field::nested(&mut self.inner),
            ]
        }
    }
}
