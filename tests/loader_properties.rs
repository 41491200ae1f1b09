//! Registry properties over randomly tagged command services

mod common;

use cmdwire_console::{Application, CommandLoader};
use cmdwire_di::{Compiler, TagValue};
use cmdwire_extension::{command_instance, ConsoleConfig, ConsoleExtension, LazyCommandLoader};
use common::StatusCommand;
use proptest::prelude::*;

fn compile(names: &[String]) -> std::sync::Arc<cmdwire_di::Container> {
    let mut config = ConsoleConfig::default();
    config.discovery.tag = Some("cmd".to_string());

    let mut compiler = Compiler::new();
    for (index, name) in names.iter().enumerate() {
        compiler
            .builder_mut()
            .add_definition(format!("app.command{}", index))
            .unwrap()
            .add_tag(
                "cmd",
                TagValue::attributes([
                    ("name", serde_json::json!(name)),
                    ("description", serde_json::json!("Generated")),
                ]),
            )
            .set_factory(|_| Ok(command_instance(StatusCommand)));
    }
    compiler.add_extension(ConsoleExtension::new(config)).unwrap();
    compiler.compile().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_names_keep_first_position_and_last_service(
        names in prop::collection::vec("[a-c]{1,2}", 0..8),
    ) {
        let container = compile(&names);
        let loader = container
            .get::<LazyCommandLoader>("console.commandLoader")
            .unwrap();

        let mut expected: Vec<String> = Vec::new();
        for name in &names {
            if !expected.contains(name) {
                expected.push(name.clone());
            }
        }
        expected.push("di:parameters".to_string());
        expected.push("commands-debug".to_string());
        prop_assert_eq!(loader.names(), expected);

        for name in &names {
            let last = names.iter().rposition(|candidate| candidate == name).unwrap();
            let expected_id = format!("console.lazy.app.command{}", last);
            prop_assert_eq!(loader.service_id(name), Some(expected_id.as_str()));
        }

        // Nothing but the loader is constructed by lookups
        prop_assert!(CommandLoader::get(loader.as_ref(), "missing").is_err());
        for index in 0..names.len() {
            let id = format!("app.command{}", index);
            prop_assert!(!container.is_created(&id));
        }

        let application = container.get_by_type::<Application>().unwrap();
        prop_assert_eq!(application.all().unwrap().len(), loader.names().len());
    }
}
