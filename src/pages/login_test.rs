use super::*;

#[test]
fn validate_login_input_trims_email_keeps_password() {
    assert_eq!(
        validate_login_input("  user@example.com  ", " secret "),
        Ok(("user@example.com".to_owned(), " secret ".to_owned()))
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "pw"), Err("Enter both email and password."));
    assert_eq!(validate_login_input("a@b.com", ""), Err("Enter both email and password."));
}

#[test]
fn validate_sign_up_input_builds_metadata() {
    let (email, password, metadata) =
        validate_sign_up_input("a@b.com", "hunter22", "  Ada Lovelace ", "zoho_admin").unwrap();
    assert_eq!(email, "a@b.com");
    assert_eq!(password, "hunter22");
    assert_eq!(metadata, SignUpMetadata { full_name: "Ada Lovelace".to_owned(), role: Role::ZohoAdmin });
}

#[test]
fn validate_sign_up_input_password_too_short() {
    assert_eq!(
        validate_sign_up_input("a@b.com", "12345", "Ada", "zoho_admin"),
        Err("Password must be at least 6 characters.")
    );
}

#[test]
fn validate_sign_up_input_requires_name_and_known_role() {
    assert_eq!(validate_sign_up_input("a@b.com", "123456", "  ", "zoho_admin"), Err("Enter your full name."));
    assert_eq!(validate_sign_up_input("a@b.com", "123456", "Ada", "root"), Err("Choose a role."));
}
