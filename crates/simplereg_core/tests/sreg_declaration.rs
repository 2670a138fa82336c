use simplereg_core::{
    schema_for, Declaration, InvalidAttributeError, SchemaBuilder, SimpleRegistration,
    SregAttribute,
};
use std::collections::BTreeMap;
use std::sync::Arc;

struct OptionalUser;
struct RequiredUser;
struct RenamedUser;
struct MixedUser;
struct ProviderUser;
struct TypoUser;

impl SimpleRegistration for OptionalUser {
    fn declare_sreg(schema: &mut SchemaBuilder) -> Result<(), InvalidAttributeError> {
        schema.optional(["nickname", "email"])?;
        Ok(())
    }
}

impl SimpleRegistration for RequiredUser {
    fn declare_sreg(schema: &mut SchemaBuilder) -> Result<(), InvalidAttributeError> {
        schema.required(["nickname", "email"])?;
        Ok(())
    }
}

impl SimpleRegistration for RenamedUser {
    fn declare_sreg(schema: &mut SchemaBuilder) -> Result<(), InvalidAttributeError> {
        schema.required([("nickname", "username")])?;
        Ok(())
    }
}

impl SimpleRegistration for MixedUser {
    fn declare_sreg(schema: &mut SchemaBuilder) -> Result<(), InvalidAttributeError> {
        schema
            .required([
                Declaration::from("email"),
                Declaration::renamed([("nickname", "username"), ("fullname", "name")]),
            ])?
            .optional([
                Declaration::from("timezone"),
                Declaration::from("dob"),
                Declaration::from([("postcode", "zip")]),
            ])?;
        Ok(())
    }
}

impl SimpleRegistration for ProviderUser {
    fn declare_sreg(schema: &mut SchemaBuilder) -> Result<(), InvalidAttributeError> {
        schema
            .required(["nickname", "email"])?
            .optional(["timezone", "dob"])?;
        Ok(())
    }
}

impl SimpleRegistration for TypoUser {
    fn declare_sreg(schema: &mut SchemaBuilder) -> Result<(), InvalidAttributeError> {
        schema.required(["emial"])?;
        Ok(())
    }
}

fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}

#[test]
fn optional_call_sets_optional_attributes() {
    assert_eq!(OptionalUser::sreg_optional().unwrap(), ["nickname", "email"]);
    assert!(OptionalUser::sreg_required().unwrap().is_empty());
}

#[test]
fn required_call_sets_required_attributes() {
    assert_eq!(RequiredUser::sreg_required().unwrap(), ["nickname", "email"]);
    assert!(RequiredUser::sreg_optional().unwrap().is_empty());
}

#[test]
fn keys_map_to_themselves_without_rename() {
    let schema = OptionalUser::sreg_schema().unwrap();
    assert_eq!(schema.external_key(SregAttribute::Nickname), Some("nickname"));
}

#[test]
fn keys_map_to_given_external_name() {
    let schema = RenamedUser::sreg_schema().unwrap();
    assert_eq!(schema.external_key(SregAttribute::Nickname), Some("username"));
    assert_eq!(schema.required_field_names(), ["nickname".to_string()]);
}

#[test]
fn mixes_optional_required_mapped_and_unmapped_attributes() {
    let schema = MixedUser::sreg_schema().unwrap();

    assert_eq!(
        sorted(schema.required_field_names().to_vec()),
        ["email", "fullname", "nickname"]
    );
    assert_eq!(
        sorted(schema.optional_field_names().to_vec()),
        ["dob", "postcode", "timezone"]
    );

    let mapping: BTreeMap<&str, &str> = schema
        .mapping()
        .iter()
        .map(|entry| (entry.internal.as_str(), entry.external.as_str()))
        .collect();
    let expected: BTreeMap<&str, &str> = [
        ("nickname", "username"),
        ("email", "email"),
        ("fullname", "name"),
        ("timezone", "timezone"),
        ("postcode", "zip"),
        ("dob", "dob"),
    ]
    .into_iter()
    .collect();
    assert_eq!(mapping, expected);
}

#[test]
fn field_lists_feed_a_provider_request() {
    let mut request_required = Vec::new();
    let mut request_optional = Vec::new();
    request_required.extend(ProviderUser::sreg_required().unwrap());
    request_optional.extend(ProviderUser::sreg_optional().unwrap());

    assert_eq!(sorted(request_required), ["email", "nickname"]);
    assert_eq!(sorted(request_optional), ["dob", "timezone"]);
}

#[test]
fn declared_types_do_not_share_schema_state() {
    let optional = schema_for::<OptionalUser>().unwrap();
    let required = schema_for::<RequiredUser>().unwrap();

    assert!(!Arc::ptr_eq(&optional, &required));
    assert!(optional.required_field_names().is_empty());
    assert!(required.optional_field_names().is_empty());
    assert!(Arc::ptr_eq(
        &optional,
        &OptionalUser::sreg_schema().unwrap()
    ));
}

#[test]
fn invalid_declaration_fails_loading() {
    let err = TypoUser::sreg_schema().unwrap_err();
    assert_eq!(err.key(), "emial");
    assert!(err.to_string().contains("emial"));
    assert!(TypoUser::sreg_required().is_err());
}
