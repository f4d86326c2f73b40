use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("slidedeck-cli").chain(args.iter().copied())).unwrap()
}

fn scale_args(width: f64, height: f64, policy: PolicyArg) -> ScaleArgs {
    ScaleArgs { width, height, policy, available_width: None, available_height: None }
}

#[test]
fn base_url_defaults_to_local_service() {
    let cli = parse(&["presentation", "get", "3"]);
    assert_eq!(cli.base_url, DEFAULT_CLI_BASE_URL);
    assert!(matches!(
        cli.command,
        Command::Presentation(PresentationCommand { command: PresentationSubcommand::Get { presentation_id: Id::Number(3) } })
    ));
}

#[test]
fn ids_accept_text() {
    let cli = parse(&["slide", "elements", "s-9f"]);
    let Command::Slide(SlideCommand { command: SlideSubcommand::Elements { slide_id } }) = cli.command else {
        panic!("expected slide elements");
    };
    assert_eq!(slide_id, Id::from("s-9f"));
}

#[test]
fn slide_fields_fill_a_draft() {
    let cli = parse(&["slide", "create", "1", "--number", "4", "--title", "Intro"]);
    let Command::Slide(SlideCommand { command: SlideSubcommand::Create { fields, .. } }) = cli.command else {
        panic!("expected slide create");
    };
    let draft = SlideDraft::from(fields);
    assert_eq!(draft.slide_number, 4);
    assert_eq!(draft.background_color, "#FFFFFF");
    assert_eq!(draft.title, "Intro");
    assert_eq!(draft.background_image_url, None);
}

#[test]
fn slide_number_is_required() {
    assert!(Cli::try_parse_from(["slidedeck-cli", "slide", "update", "5"]).is_err());
}

#[test]
fn scale_unconstrained_may_upscale() {
    let report = scale_report(&scale_args(1920.0, 1080.0, PolicyArg::Unconstrained)).unwrap();
    assert!((report.scale - 2.0).abs() < 1e-9);
}

#[test]
fn scale_margins_never_upscale() {
    let report = scale_report(&scale_args(3000.0, 3000.0, PolicyArg::Margins)).unwrap();
    assert!((report.scale - 1.0).abs() < 1e-9);
    assert!((report.region_width - 2920.0).abs() < 1e-9);
    assert!((report.region_height - 2760.0).abs() < 1e-9);
}

#[test]
fn scale_clamp_uses_available_width() {
    let mut args = scale_args(1920.0, 1080.0, PolicyArg::Clamp);
    args.available_width = Some(240.0);
    let report = scale_report(&args).unwrap();
    assert!((report.scale - 0.25).abs() < 1e-9);
}

#[test]
fn scale_degenerate_region_is_an_error() {
    let result = scale_report(&scale_args(80.0, 800.0, PolicyArg::Margins));
    assert!(matches!(result, Err(CliError::DegenerateRegion { .. })));
}

#[test]
fn scale_report_serializes_policy_name() {
    let report = scale_report(&scale_args(960.0, 540.0, PolicyArg::Clamp)).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["policy"], "clamp");
    assert_eq!(json["scale"], 1.0);
}

#[test]
fn parse_patch_reads_partial_fields() {
    let patch = parse_patch(r#"{"x_position": 12, "bold": true}"#).unwrap();
    assert_eq!(patch.x_position, Some(12.0));
    assert_eq!(patch.bold, Some(true));
    assert_eq!(patch.content, None);
    assert!(parse_patch("not json").is_err());
}

#[test]
fn image_type_from_extension() {
    assert_eq!(guess_image_type("photo.JPG"), Some("image/jpeg"));
    assert_eq!(guess_image_type("diagram.svg"), Some("image/svg+xml"));
    assert_eq!(guess_image_type("notes.txt"), None);
    assert_eq!(guess_image_type("README"), None);
}

#[test]
fn api_errors_carry_readable_message() {
    let err = CliError::from(ApiError::Status { status: 401, server_message: Some("Invalid credentials".to_owned()) });
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn read_upload_names_file_and_guesses_type() {
    let path = std::env::temp_dir().join(format!("slidedeck-cli-{}.png", std::process::id()));
    tokio::fs::write(&path, [0x89, b'P', b'N', b'G']).await.unwrap();

    let upload = read_upload(path.clone(), None).await.unwrap();
    assert_eq!(upload.file_name, path.file_name().unwrap().to_string_lossy());
    assert_eq!(upload.content_type.as_deref(), Some("image/png"));
    assert_eq!(upload.bytes.len(), 4);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn read_upload_missing_file_is_reported() {
    let result = read_upload(PathBuf::from("/nonexistent/slide.png"), None).await;
    assert!(matches!(result, Err(CliError::ReadFile { .. })));
}

#[test]
fn numeric_ids_stay_numbers_in_request_bodies() {
    let cli = parse(&["presentation", "create", "--user-id", "42", "--title", "T", "--description", "D"]);
    let Command::Presentation(PresentationCommand {
        command: PresentationSubcommand::Create { user_id, title, description },
    }) = cli.command
    else {
        panic!("expected presentation create");
    };
    let payload = deck::types::NewPresentation { user_id, title, description };
    let request = deck::api::requests::create_presentation(&ApiConfig::new(DEFAULT_CLI_BASE_URL), &payload).unwrap();
    assert_eq!(
        request.body,
        deck::api::Body::Json(serde_json::json!({ "user_id": 42, "title": "T", "description": "D" }))
    );
}

#[test]
fn id_parser_keeps_text_ids() {
    assert_eq!(parse_id("12").unwrap(), Id::Number(12));
    assert_eq!(parse_id("s-9f").unwrap(), Id::from("s-9f"));
}
