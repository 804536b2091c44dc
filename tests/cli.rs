use clap::Parser;
use gmail_probe::cli::{AuthCommand, Cli, Command};

#[test]
fn parses_auth_login() {
    let cli = Cli::try_parse_from(["gmail-probe", "auth", "login"]).expect("cli parse should work");
    match cli.command {
        Command::Auth(auth) => assert!(matches!(auth.command, AuthCommand::Login)),
        _ => panic!("expected auth command"),
    }
}

#[test]
fn parses_count_without_subject() {
    let cli = Cli::try_parse_from(["gmail-probe", "count"]).expect("cli parse should work");
    match cli.command {
        Command::Count(count) => assert!(count.subject.is_none()),
        _ => panic!("expected count command"),
    }
}

#[test]
fn parses_exists_with_wait_and_globals() {
    let cli = Cli::try_parse_from([
        "gmail-probe",
        "exists",
        "--subject",
        "Confirm your signup",
        "--wait",
        "90",
        "--json",
        "-vv",
        "--profile",
        "qa",
    ])
    .expect("cli parse should work");

    assert!(cli.json);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.profile, "qa");
    match cli.command {
        Command::Exists(exists) => {
            assert_eq!(exists.subject, "Confirm your signup");
            assert_eq!(exists.wait, 90);
        }
        _ => panic!("expected exists command"),
    }
}

#[test]
fn exists_wait_defaults_to_zero() {
    let cli = Cli::try_parse_from(["gmail-probe", "exists", "--subject", "hello"])
        .expect("cli parse should work");
    match cli.command {
        Command::Exists(exists) => assert_eq!(exists.wait, 0),
        _ => panic!("expected exists command"),
    }
}

#[test]
fn exists_requires_subject() {
    assert!(Cli::try_parse_from(["gmail-probe", "exists"]).is_err());
}

#[test]
fn parses_attachment_filters() {
    let cli = Cli::try_parse_from([
        "gmail-probe",
        "attachment",
        "--subject",
        "statement",
        "--name-contains",
        "2024",
        "--extension",
        "pdf",
        "--out",
        "downloads",
    ])
    .expect("cli parse should work");
    match cli.command {
        Command::Attachment(args) => {
            assert_eq!(args.name_contains.as_deref(), Some("2024"));
            assert_eq!(args.extension.as_deref(), Some("pdf"));
            assert_eq!(
                args.out.as_deref(),
                Some(std::path::Path::new("downloads"))
            );
        }
        _ => panic!("expected attachment command"),
    }
}

#[test]
fn parses_send() {
    let cli = Cli::try_parse_from([
        "gmail-probe",
        "send",
        "--to",
        "dev@example.com",
        "--subject",
        "hi",
        "--body",
        "hello",
        "--attach",
        "a.txt",
        "--attach",
        "b.txt",
    ])
    .expect("cli parse should work");
    match cli.command {
        Command::Send(send) => {
            assert_eq!(send.to, "dev@example.com");
            assert_eq!(send.subject, "hi");
            assert_eq!(send.body.as_deref(), Some("hello"));
            assert_eq!(send.attach.len(), 2);
        }
        _ => panic!("expected send command"),
    }
}

#[test]
fn purge_confirmation_defaults_off() {
    let cli = Cli::try_parse_from(["gmail-probe", "purge"]).expect("cli parse should work");
    match cli.command {
        Command::Purge(purge) => assert!(!purge.yes),
        _ => panic!("expected purge command"),
    }
}
