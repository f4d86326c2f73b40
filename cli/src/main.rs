mod transport;

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use deck::api::{ApiClient, ApiConfig, Upload};
use deck::credential::StaticToken;
use deck::error::{ApiError, error_message};
use deck::routes::segment_id;
use deck::scale::{Available, DESIGN_CANVAS, Region, ScalePolicy};
use deck::types::{ElementPatch, Id, ImageElementDraft, PresentationUpdate, SlideDraft, TextElementDraft};
use serde::Serialize;

use transport::ReqwestTransport;

const DEFAULT_CLI_BASE_URL: &str = "http://localhost:5001/api";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("viewport {width}x{height} leaves no room for the canvas")]
    DegenerateRegion { width: f64, height: f64 },
}

impl From<ApiError> for CliError {
    fn from(source: ApiError) -> Self {
        Self::Api { message: error_message(&source), source }
    }
}

#[derive(Parser, Debug)]
#[command(name = "slidedeck-cli", about = "SlideDeck presentation API CLI")]
struct Cli {
    #[arg(long, env = "SLIDEDECK_BASE_URL", default_value = DEFAULT_CLI_BASE_URL)]
    base_url: String,

    /// Bearer token sent as `Authorization`; omitted when empty.
    #[arg(long, env = "SLIDEDECK_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
    },
    Presentation(PresentationCommand),
    Slide(SlideCommand),
    Element(ElementCommand),
    /// Upload an image file and print its URL.
    Upload {
        path: PathBuf,
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Print the scale that fits the 960x540 canvas into a viewport.
    Scale(ScaleArgs),
}

#[derive(Args, Debug)]
struct PresentationCommand {
    #[command(subcommand)]
    command: PresentationSubcommand,
}

#[derive(Subcommand, Debug)]
enum PresentationSubcommand {
    List {
        #[arg(value_parser = parse_id)]
        user_id: Id,
    },
    Get {
        #[arg(value_parser = parse_id)]
        presentation_id: Id,
    },
    Create {
        #[arg(long, value_parser = parse_id)]
        user_id: Id,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        #[arg(value_parser = parse_id)]
        presentation_id: Id,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        #[arg(value_parser = parse_id)]
        presentation_id: Id,
    },
}

#[derive(Args, Debug)]
struct SlideCommand {
    #[command(subcommand)]
    command: SlideSubcommand,
}

#[derive(Args, Debug)]
struct SlideFields {
    #[arg(long)]
    number: i64,
    #[arg(long, default_value = "#FFFFFF")]
    background_color: String,
    #[arg(long)]
    background_image_url: Option<String>,
    #[arg(long, default_value = "")]
    title: String,
}

impl From<SlideFields> for SlideDraft {
    fn from(fields: SlideFields) -> Self {
        Self {
            slide_number: fields.number,
            background_color: fields.background_color,
            background_image_url: fields.background_image_url,
            title: fields.title,
        }
    }
}

#[derive(Subcommand, Debug)]
enum SlideSubcommand {
    Create {
        #[arg(value_parser = parse_id)]
        presentation_id: Id,
        #[command(flatten)]
        fields: SlideFields,
    },
    Update {
        #[arg(value_parser = parse_id)]
        slide_id: Id,
        #[command(flatten)]
        fields: SlideFields,
    },
    Delete {
        #[arg(value_parser = parse_id)]
        slide_id: Id,
    },
    /// List a slide's elements.
    Elements {
        #[arg(value_parser = parse_id)]
        slide_id: Id,
    },
}

#[derive(Args, Debug)]
struct ElementCommand {
    #[command(subcommand)]
    command: ElementSubcommand,
}

#[derive(Subcommand, Debug)]
enum ElementSubcommand {
    Text {
        #[arg(value_parser = parse_id)]
        slide_id: Id,
        content: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
        #[arg(long)]
        font_size: Option<f64>,
        #[arg(long)]
        font_color: Option<String>,
        #[arg(long, default_value_t = 0)]
        z_index: i64,
    },
    Image {
        #[arg(value_parser = parse_id)]
        slide_id: Id,
        image_url: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long, default_value_t = 0)]
        z_index: i64,
    },
    Update {
        #[arg(value_parser = parse_id)]
        element_id: Id,
        /// JSON object with the fields to change.
        #[arg(long)]
        data: String,
    },
    Delete {
        #[arg(value_parser = parse_id)]
        element_id: Id,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Whole viewport, may upscale (play mode).
    Unconstrained,
    /// Available size with viewport fallback, never upscales (thumbnails).
    Clamp,
    /// Viewport minus editor margins, never upscales (slide editor).
    Margins,
}

impl From<PolicyArg> for ScalePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Unconstrained => Self::Unconstrained,
            PolicyArg::Clamp => Self::ClampToOne,
            PolicyArg::Margins => Self::with_margins(),
        }
    }
}

#[derive(Args, Debug)]
struct ScaleArgs {
    width: f64,
    height: f64,
    #[arg(long, value_enum, default_value_t = PolicyArg::Unconstrained)]
    policy: PolicyArg,
    #[arg(long)]
    available_width: Option<f64>,
    #[arg(long)]
    available_height: Option<f64>,
}

#[derive(Debug, PartialEq, Serialize)]
struct ScaleReport {
    policy: PolicyArg,
    region_width: f64,
    region_height: f64,
    scale: f64,
}

impl Serialize for PolicyArg {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let name = self.to_possible_value().map(|v| v.get_name().to_owned()).unwrap_or_default();
        serializer.serialize_str(&name)
    }
}

type CliClient = ApiClient<ReqwestTransport, StaticToken>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let client = ApiClient::new(
        ApiConfig::new(cli.base_url),
        ReqwestTransport::new(reqwest::Client::builder().build()?),
        StaticToken(cli.token.unwrap_or_default()),
    );

    match cli.command {
        Command::Login { username, password } => print_json(&client.login(&username, &password).await?),
        Command::Register { username, email, password } => {
            print_json(&client.register(&username, &email, &password).await?)
        }
        Command::Presentation(command) => run_presentation(&client, command.command).await,
        Command::Slide(command) => run_slide(&client, command.command).await,
        Command::Element(command) => run_element(&client, command.command).await,
        Command::Upload { path, content_type } => {
            let upload = read_upload(path, content_type).await?;
            print_json(&client.upload_image(upload).await?)
        }
        Command::Scale(args) => print_json(&scale_report(&args)?),
    }
}

async fn run_presentation(client: &CliClient, command: PresentationSubcommand) -> Result<(), CliError> {
    match command {
        PresentationSubcommand::List { user_id } => print_json(&client.user_presentations(&user_id).await?),
        PresentationSubcommand::Get { presentation_id } => print_json(&client.get_presentation(&presentation_id).await?),
        PresentationSubcommand::Create { user_id, title, description } => {
            print_json(&client.create_presentation(user_id, &title, description.as_deref()).await?)
        }
        PresentationSubcommand::Update { presentation_id, title, description } => {
            let update = PresentationUpdate { title, description };
            print_json(&client.update_presentation(&presentation_id, &update).await?)
        }
        PresentationSubcommand::Delete { presentation_id } => {
            client.delete_presentation(&presentation_id).await?;
            print_json(&serde_json::json!({ "deleted": presentation_id }))
        }
    }
}

async fn run_slide(client: &CliClient, command: SlideSubcommand) -> Result<(), CliError> {
    match command {
        SlideSubcommand::Create { presentation_id, fields } => {
            print_json(&client.create_slide(&presentation_id, &fields.into()).await?)
        }
        SlideSubcommand::Update { slide_id, fields } => print_json(&client.update_slide(&slide_id, &fields.into()).await?),
        SlideSubcommand::Delete { slide_id } => {
            client.delete_slide(&slide_id).await?;
            print_json(&serde_json::json!({ "deleted": slide_id }))
        }
        SlideSubcommand::Elements { slide_id } => print_json(&client.slide_elements(&slide_id).await?),
    }
}

async fn run_element(client: &CliClient, command: ElementSubcommand) -> Result<(), CliError> {
    match command {
        ElementSubcommand::Text { slide_id, content, x, y, font_size, font_color, z_index } => {
            let mut draft = TextElementDraft::new(content, x, y);
            if let Some(size) = font_size {
                draft.font_size = size;
            }
            if let Some(color) = font_color {
                draft.font_color = color;
            }
            draft.z_index = z_index;
            print_json(&client.create_text_element(&slide_id, &draft).await?)
        }
        ElementSubcommand::Image { slide_id, image_url, x, y, width, height, z_index } => {
            let mut draft = ImageElementDraft::new(image_url, x, y);
            draft.width = width;
            draft.height = height;
            draft.z_index = z_index;
            print_json(&client.create_image_element(&slide_id, &draft).await?)
        }
        ElementSubcommand::Update { element_id, data } => {
            let patch = parse_patch(&data)?;
            print_json(&client.update_element(&element_id, &patch).await?)
        }
        ElementSubcommand::Delete { element_id } => {
            client.delete_element(&element_id).await?;
            print_json(&serde_json::json!({ "deleted": element_id }))
        }
    }
}

/// Path-style id: digits stay numeric so request bodies carry JSON numbers.
fn parse_id(raw: &str) -> Result<Id, Infallible> {
    Ok(segment_id(raw))
}

fn parse_patch(data: &str) -> Result<ElementPatch, CliError> {
    Ok(serde_json::from_str::<ElementPatch>(data)?)
}

async fn read_upload(path: PathBuf, content_type: Option<String>) -> Result<Upload, CliError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| CliError::ReadFile { path: path.clone(), source })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
    let content_type = content_type.or_else(|| guess_image_type(&file_name).map(str::to_owned));
    Ok(Upload { file_name, content_type, bytes })
}

fn guess_image_type(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

fn scale_report(args: &ScaleArgs) -> Result<ScaleReport, CliError> {
    let policy = ScalePolicy::from(args.policy);
    let viewport = Region::new(args.width, args.height);
    let available = Available::new(args.available_width, args.available_height);
    let region = policy.region(viewport, available);
    let scale = policy
        .scale_for(DESIGN_CANVAS, viewport, available)
        .ok_or(CliError::DegenerateRegion { width: region.width, height: region.height })?;
    Ok(ScaleReport { policy: args.policy, region_width: region.width, region_height: region.height, scale })
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
