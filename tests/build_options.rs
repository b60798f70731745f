use bunner_regex_build::flags::FlagsError;
use bunner_regex_build::options::OptionsError;
use bunner_regex_build::{BuildError, BuildOptions, Expression, Flags, SubpatternTable, build_with_options};

#[test]
fn builder_defaults_match_default() {
    let options = BuildOptions::builder()
        .build()
        .expect("default options should be valid");
    assert_eq!(options, BuildOptions::default());
    assert!(options.flags.is_empty());
    assert_eq!(options.backtrack_limit, None);
}

#[test]
fn builder_sets_every_field() {
    let options = BuildOptions::builder()
        .flags(Flags::MULTI_LINE)
        .backtrack_limit(500)
        .delegate_size_limit(1 << 20)
        .delegate_dfa_size_limit(1 << 21)
        .build()
        .expect("options should be valid");

    assert_eq!(options.flags, Flags::MULTI_LINE);
    assert_eq!(options.backtrack_limit, Some(500));
    assert_eq!(options.delegate_size_limit, Some(1 << 20));
    assert_eq!(options.delegate_dfa_size_limit, Some(1 << 21));
}

#[test]
fn flags_str_parses_letters() {
    let options = BuildOptions::builder()
        .flags_str("Usx")
        .build()
        .expect("options should be valid");
    assert_eq!(
        options.flags,
        Flags::SWAP_GREED | Flags::DOT_MATCHES_NEW_LINE | Flags::EXTENDED
    );
    assert_eq!(options.flags.to_string(), "sxU");
}

#[test]
fn rejects_unknown_flag_letter() {
    let err = BuildOptions::builder()
        .flags_str("iq")
        .build()
        .expect_err("q is not a flag");
    match err {
        OptionsError::Flags(FlagsError::UnknownFlag { flag, .. }) => assert_eq!(flag, 'q'),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_zero_limits() {
    let err = BuildOptions::builder()
        .backtrack_limit(0)
        .build()
        .expect_err("zero backtrack limit should be rejected");
    assert_eq!(err, OptionsError::BacktrackLimitInvalid { provided: 0 });

    let err = BuildOptions::builder()
        .delegate_dfa_size_limit(0)
        .build()
        .expect_err("zero dfa size limit should be rejected");
    match err {
        OptionsError::SizeLimitInvalid { field } => assert_eq!(field, "delegate_dfa_size_limit"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn build_validates_hand_written_options() {
    let options = BuildOptions {
        delegate_size_limit: Some(0),
        ..BuildOptions::default()
    };
    let err = build_with_options("a", &SubpatternTable::new(), &options)
        .expect_err("invalid options should fail");
    match err {
        BuildError::Options(OptionsError::SizeLimitInvalid { .. }) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn options_flow_into_compiled_expression() {
    let options = BuildOptions::builder()
        .flags(Flags::IGNORE_CASE)
        .backtrack_limit(1_000)
        .build()
        .expect("options should be valid");
    let subs = SubpatternTable::new().with("pair", "(a)\\1");
    let expression = build_with_options("^{{pair}}$", &subs, &options).expect("should build");

    assert_eq!(expression.flags(), Flags::IGNORE_CASE);
    assert!(expression.is_match("AA").expect("match should run"));

    let direct = Expression::with_options("^(a)\\1$", &options).expect("should compile");
    assert!(direct.is_match("AA").expect("match should run"));
}

#[test]
fn options_round_trip_through_json() {
    let options = BuildOptions::builder()
        .flags(Flags::IGNORE_CASE | Flags::EXTENDED)
        .backtrack_limit(2_000)
        .build()
        .expect("options should be valid");

    let json = serde_json::to_string(&options).expect("options should serialize");
    let restored: BuildOptions = serde_json::from_str(&json).expect("options should deserialize");
    assert_eq!(restored, options);
}
