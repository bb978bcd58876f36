/*!
 * Tests for language code utilities
 */

use anyhow::Result;
use doctran::language_utils::{
    self, LanguageCodeType, catalog_contains, get_language_name, language_codes_match,
    normalize_to_part2t, validate_language_code,
};
use doctran::providers::LanguageOption;

/// Test validation of the three ISO code forms
#[test]
fn test_validate_language_code_withIsoCodes_shouldReturnType() -> Result<()> {
    assert_eq!(validate_language_code("fi")?, LanguageCodeType::Part1);
    assert_eq!(validate_language_code("FIN")?, LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("ger")?, LanguageCodeType::Part2B);
    Ok(())
}

/// Test that made-up codes are rejected
#[test]
fn test_validate_language_code_withInvalidCode_shouldFail() {
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("english").is_err());
    assert!(validate_language_code("").is_err());
}

/// Test normalization to ISO 639-2/T
#[test]
fn test_normalize_to_part2t_withVariousForms_shouldReturnTerminologyCode() -> Result<()> {
    assert_eq!(normalize_to_part2t("sv")?, "swe");
    assert_eq!(normalize_to_part2t(" DE ")?, "deu");
    assert_eq!(normalize_to_part2t("fre")?, "fra");
    Ok(())
}

/// Test matching across code forms
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldReturnTrue() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("fre", "fr"));
    assert!(!language_codes_match("fi", "sv"));
}

/// Test that non-ISO tags only match literally
#[test]
fn test_language_codes_match_withRegionalTags_shouldCompareLiterally() {
    assert!(language_codes_match("zh-TW", "zh-tw"));
    assert!(!language_codes_match("zh-TW", "zh"));
}

/// Test English names for codes
#[test]
fn test_get_language_name_withValidCode_shouldReturnName() -> Result<()> {
    assert_eq!(get_language_name("fi")?, "Finnish");
    assert_eq!(get_language_name("ja")?, "Japanese");
    assert!(get_language_name("xx").is_err());
    Ok(())
}

/// Test display names for catalog entries
#[test]
fn test_display_name_shouldPreferBackendName() {
    let named = LanguageOption::new("sv", Some("Svenska"));
    let unnamed = LanguageOption::new("de", None);
    let unknown = LanguageOption::new("zh-TW", None);

    assert_eq!(language_utils::display_name(&named), "Svenska");
    assert_eq!(language_utils::display_name(&unnamed), "German");
    assert_eq!(language_utils::display_name(&unknown), "zh-TW");
}

/// Test catalog membership across code forms
#[test]
fn test_catalog_contains_shouldMatchEquivalentCodes() {
    let catalog = vec![LanguageOption::new("fi", None), LanguageOption::new("sv", None)];

    assert!(catalog_contains(&catalog, "fin"));
    assert!(catalog_contains(&catalog, "SV"));
    assert!(!catalog_contains(&catalog, "ja"));
    assert!(!catalog_contains(&[], "fi"));
}
