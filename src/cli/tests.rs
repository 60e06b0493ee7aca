use super::*;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["localchat"]);
    assert_eq!(args.command, None);
    assert!(args.is_interactive());

    let args = parse_args(&["localchat", "chat", "-m", "mistral"]);
    assert_eq!(args.command, Some(Commands::Chat));
    assert_eq!(args.model.as_deref(), Some("mistral"));
}

#[test]
fn say_collects_prompt_words() {
    let args = parse_args(&["localchat", "-p", "lmstudio", "say", "why", "is", "-the", "sky"]);
    assert_eq!(
        args.command,
        Some(Commands::Say {
            prompt: vec!["why".into(), "is".into(), "-the".into(), "sky".into()]
        })
    );
    assert!(!args.is_interactive());
}

#[test]
fn say_requires_a_prompt() {
    assert!(Args::try_parse_from(["localchat", "say"]).is_err());
}

#[test]
fn global_flags_are_accepted_after_subcommand() {
    let args = parse_args(&[
        "localchat",
        "models",
        "--ollama-url",
        "http://gpu-box:11434/api/generate",
        "--log",
        "/tmp/localchat.log",
    ]);
    assert_eq!(args.command, Some(Commands::Models));
    assert_eq!(
        args.ollama_url.as_deref(),
        Some("http://gpu-box:11434/api/generate")
    );
    assert_eq!(args.log, Some(PathBuf::from("/tmp/localchat.log")));
}

#[test]
fn set_joins_multi_word_values() {
    let args = parse_args(&["localchat", "set", "default-model", "llama3.1:8b", "instruct"]);
    assert_eq!(
        args.command,
        Some(Commands::Set {
            key: "default-model".into(),
            value: vec!["llama3.1:8b".into(), "instruct".into()],
        })
    );
}

#[test]
fn overrides_parse_provider_names() {
    let args = parse_args(&["localchat", "-p", "lm-studio", "-m", "qwen"]);
    let overrides = args.overrides().expect("valid provider");
    assert_eq!(overrides.provider, Some(Provider::LmStudio));
    assert_eq!(overrides.model.as_deref(), Some("qwen"));
    assert_eq!(overrides.ollama_url, None);
}

#[test]
fn overrides_reject_unknown_provider() {
    let args = parse_args(&["localchat", "-p", "openai"]);
    let err = args.overrides().expect_err("unknown provider");
    assert!(err.to_string().contains("openai"));
}
