//! Escenarios end-to-end del registro de usuarios: las dos rutas de
//! short-circuit y las dos rutas de negocio.
use proc_adapters::{InMemoryUserRepository, UserCreation};
use proc_core::{Instance, OutcomePattern, Process, Record};
use serde_json::json;

#[test]
fn invalid_dependencies_short_circuit_before_the_body() {
    let repository = InMemoryUserRepository::new();
    let mut instance = Instance::with_dependencies(UserCreation::new(repository.clone()),
                                                   json!({"repository": "object"}));

    let result = instance.call(json!({"name": "John", "email": "john@email.com", "password": "321321321"}))
                         .expect("call should complete");

    assert!(result.is_failure());
    assert!(result.is_failure_tagged("invalid_dependencies"));
    assert!(result.is("invalid_dependencies"));
    assert!(result.tag_query("invalid_dependencies?"));

    // El payload expone únicamente el record ofensor.
    assert_eq!(result.value().keys().map(|k| k.as_str()).collect::<Vec<_>>(), vec!["dependencies"]);
    let dependencies = result.get("dependencies").expect("record in payload");
    assert_eq!(dependencies["valid"], json!(false));
    assert_eq!(dependencies["errors"]["repository"], json!(["inclusion"]));

    // El record ligado en la instancia conserva los errores por campo.
    assert!(instance.deps().expect("bound").error_added("repository", "inclusion"));
    // Sin efectos: el cuerpo nunca corrió.
    assert_eq!(repository.count(), 0);
}

#[test]
fn invalid_input_yields_field_errors_and_no_side_effects() {
    let repository = InMemoryUserRepository::new();
    let result = UserCreation::new(repository.clone()).run(json!({"name": "  ", "email": "bad"}))
                                                      .expect("call should complete");

    assert!(result.is_failure_tagged("invalid_input"));
    assert_eq!(result.value().keys().map(|k| k.as_str()).collect::<Vec<_>>(), vec!["input"]);

    let input = result.get("input").expect("record in payload");
    assert_eq!(input["errors"]["name"], json!(["blank"]));
    assert_eq!(input["errors"]["email"], json!(["invalid"]));
    assert_eq!(input["errors"]["password"], json!(["blank"]));

    assert_eq!(repository.count(), 0);
}

#[test]
fn successful_creation_normalizes_input_and_stores_the_user() {
    let repository = InMemoryUserRepository::new();
    let mut instance = Instance::new(UserCreation::new(repository.clone()));

    let result = instance.call(json!({
                             "name": "\tJohn     Doe \n",
                             "email": "   JOHN.doe@email.com",
                             "password": "123123123",
                         }))
                         .expect("call should complete");

    assert!(result.is_success());
    assert!(result.is_success_tagged("user_created"));
    assert_eq!(result.value().keys().map(|k| k.as_str()).collect::<Vec<_>>(), vec!["user"]);

    let user = result.get("user").expect("user in payload");
    assert_eq!(user["name"], json!("John Doe"));
    assert_eq!(user["email"], json!("john.doe@email.com"));
    uuid::Uuid::parse_str(user["uuid"].as_str().expect("uuid string")).expect("well-formed uuid");

    assert_eq!(repository.count(), 1);
    let stored = repository.find_by_email("john.doe@email.com").expect("stored");
    assert_eq!(stored.name, "John Doe");

    // El input ligado quedó normalizado en la instancia.
    let input = instance.input().expect("bound");
    assert_eq!(input.get("email"), Some(&json!("john.doe@email.com")));
    assert!(input.is_valid());
}

#[test]
fn duplicated_emails_are_a_business_failure_not_an_error() {
    let repository = InMemoryUserRepository::new();
    let attrs = json!({"name": "John Doe", "email": "john.doe@email.com", "password": "123123123"});

    UserCreation::new(repository.clone()).run(attrs.clone()).expect("first call should complete");
    let result = UserCreation::new(repository.clone()).run(attrs).expect("second call should complete");

    assert!(result.is_failure_tagged("email_already_taken"));
    assert!(result.tag_query("email_already_taken?"));
    assert!(result.matches(&OutcomePattern::failure().tag("email_already_taken").key("email")));
    assert_eq!(repository.count(), 1);
}

#[test]
fn an_exact_schema_input_record_is_accepted_as_the_call_argument() {
    let repository = InMemoryUserRepository::new();
    let process = UserCreation::new(repository.clone());
    let schema = process.input_schema().expect("schema declared");

    let record = Record::new(schema,
                             json!({"name": "Jane Doe", "email": "jane@x.com", "password": "123123123"}));
    let result = process.run(record).expect("call should complete");

    assert!(result.is_success_tagged("user_created"));
    assert_eq!(repository.count(), 1);
}
