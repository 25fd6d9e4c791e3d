use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::cursor;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal;
use directories::ProjectDirs;
use slidepdf_core::{
    FrameBuffer, PresentationProfile, Presenter, PresenterEvent, ScreenLayout, Size, ThumbGrid,
    TimingReport,
};
use slidepdf_render::{PageRasterizer, RenderPipeline};
use slidepdf_tty::{write_status_line, DrawParams, EventMapper, KittyImageWriter, UiEvent};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "slidepdf",
    version,
    about = "kitty-native PDF presentation tool with annotations and rehearsal timing"
)]
struct Args {
    /// Timing profile from a previous run, shown as pacing bars
    #[arg(short = 'p', long = "profile")]
    profile: Option<PathBuf>,

    /// The PDF document to present
    document: PathBuf,
}

struct RawModeGuard;

impl RawModeGuard {
    fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, EnableMouseCapture, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = crossterm::execute!(stdout, DisableMouseCapture, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let project_dirs = ProjectDirs::from("net", "slidepdf", "slidepdf")
        .ok_or_else(|| anyhow!("unable to resolve platform data directories"))?;
    let _log_guard = init_logging(&project_dirs)?;

    let profile = match &args.profile {
        Some(path) => Some(
            PresentationProfile::load(path)
                .with_context(|| format!("failed to load profile {:?}", path))?,
        ),
        None => None,
    };

    let document = open_document(&args.document)?;
    let page_count = document.page_count();
    if page_count == 0 {
        return Err(anyhow!("{:?} has no pages", args.document));
    }
    info!(document = ?args.document, pages = page_count, "presentation loaded");

    let geometry = terminal_geometry()?;
    let layout = ScreenLayout::single(geometry.frame);
    let grid = ThumbGrid::for_page_count(page_count, layout.common());

    let mut pipeline = RenderPipeline::prepare(document, layout.common(), grid.cell)
        .context("failed to reserve the render cache")?;
    pipeline.start()?;

    let mut presenter = Presenter::new(Arc::new(pipeline.handle()), layout);
    if let Some(profile) = profile {
        presenter.set_profile(profile);
    }

    let report = run_ui(&mut presenter, &pipeline, &geometry)?;
    pipeline.stop();

    if let Some(report) = report {
        print!("{}", report);
    }
    Ok(())
}

struct TerminalGeometry {
    columns: u32,
    rows: u32,
    cell_width: u32,
    cell_height: u32,
    /// Pixel area of the presentation frame; the bottom row is reserved for
    /// the status line.
    frame: Size,
}

fn terminal_geometry() -> Result<TerminalGeometry> {
    let (columns, rows, pixel_width, pixel_height) = match terminal::window_size() {
        Ok(window) => (
            u32::from(window.columns),
            u32::from(window.rows),
            u32::from(window.width),
            u32::from(window.height),
        ),
        Err(_) => {
            let (columns, rows) = terminal::size()?;
            (u32::from(columns), u32::from(rows), 0, 0)
        }
    };
    let columns = columns.max(1);
    let rows = rows.max(2);
    // Some terminals report no pixel size; assume an 8x16 cell.
    let pixel_width = if pixel_width > 0 { pixel_width } else { columns * 8 };
    let pixel_height = if pixel_height > 0 { pixel_height } else { rows * 16 };
    let cell_width = (pixel_width / columns).max(1);
    let cell_height = (pixel_height / rows).max(1);
    Ok(TerminalGeometry {
        columns,
        rows,
        cell_width,
        cell_height,
        frame: Size::new(cell_width * columns, cell_height * (rows - 1)),
    })
}

fn open_document(path: &Path) -> Result<Arc<dyn PageRasterizer>> {
    #[cfg(feature = "pdfium")]
    {
        let rasterizer = slidepdf_render::PdfiumRasterizer::open(path)?;
        Ok(Arc::new(rasterizer))
    }
    #[cfg(not(feature = "pdfium"))]
    {
        let _ = path;
        Err(anyhow!(
            "this build has no PDF backend; rebuild with --features pdfium"
        ))
    }
}

fn run_ui(
    presenter: &mut Presenter,
    pipeline: &RenderPipeline,
    geometry: &TerminalGeometry,
) -> Result<Option<TimingReport>> {
    let _raw = RawModeGuard::new()?;
    let mut writer = KittyImageWriter::new(io::stdout());
    writer.clear_all()?;
    let mut mapper = EventMapper::new();
    let mut dirty = true;
    let mut last_tick = Instant::now();

    loop {
        while let Some(page) = pipeline.try_next_rendered() {
            presenter.page_changed(page);
        }
        if presenter.timer_active() && last_tick.elapsed() >= Duration::from_secs(1) {
            presenter.tick();
            last_tick = Instant::now();
        }
        for event in presenter.take_events() {
            match event {
                PresenterEvent::Repaint { .. } => dirty = true,
                PresenterEvent::TimerChanged { .. } => {
                    last_tick = Instant::now();
                    dirty = true;
                }
            }
        }

        if dirty {
            redraw(&mut writer, presenter, pipeline.page_count(), geometry)?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(100))? {
            let ui_event = mapper.map_event(event::read()?);
            if apply_event(presenter, ui_event, geometry) {
                break;
            }
        }
    }

    writer.clear_all()?;
    Ok(presenter.finish_timing())
}

/// Routes one input to the presenter; returns true on quit. Mouse positions
/// arrive in terminal cells and are mapped to the cell's center pixel.
fn apply_event(presenter: &mut Presenter, event: UiEvent, geometry: &TerminalGeometry) -> bool {
    let to_pixels = |x: i32, y: i32| {
        (
            x * geometry.cell_width as i32 + geometry.cell_width as i32 / 2,
            y * geometry.cell_height as i32 + geometry.cell_height as i32 / 2,
        )
    };
    match event {
        UiEvent::PreviousPage => presenter.previous_page(),
        UiEvent::NextPage => presenter.next_page(),
        UiEvent::PageUp => presenter.page_up(),
        UiEvent::PageDown => presenter.page_down(),
        UiEvent::FirstPage => presenter.first_page(),
        UiEvent::LastPage => presenter.last_page(),
        UiEvent::Confirm => presenter.confirm_page(),
        UiEvent::ToggleWhite => presenter.toggle_white(),
        UiEvent::ToggleBlack => presenter.toggle_black(),
        UiEvent::ToggleThumbnails => presenter.toggle_thumbnails(),
        UiEvent::ToggleTimer => presenter.toggle_timer(),
        UiEvent::ResetTimer => presenter.reset_timer(),
        UiEvent::ClearScribble => presenter.clear_scribble(),
        UiEvent::SetLineWidth(width) => presenter.set_line_width(width),
        UiEvent::SetLineColor(color) => presenter.set_line_color(color),
        UiEvent::Clicked { x, y } => {
            let (x, y) = to_pixels(x, y);
            presenter.clicked(x, y);
        }
        UiEvent::DrawLine { x1, y1, x2, y2 } => {
            let (x1, y1) = to_pixels(x1, y1);
            let (x2, y2) = to_pixels(x2, y2);
            presenter.draw_line(x1, y1, x2, y2, 1.0);
        }
        UiEvent::EraseLine { x1, y1, x2, y2 } => {
            let (x1, y1) = to_pixels(x1, y1);
            let (x2, y2) = to_pixels(x2, y2);
            presenter.erase_line(x1, y1, x2, y2, 1.0);
        }
        UiEvent::Quit => return true,
        UiEvent::None => {}
    }
    false
}

fn redraw(
    writer: &mut KittyImageWriter<io::Stdout>,
    presenter: &Presenter,
    page_count: usize,
    geometry: &TerminalGeometry,
) -> Result<()> {
    let mut frame = FrameBuffer::new(geometry.frame.width, geometry.frame.height);
    presenter.paint(&mut frame, 0);
    let texts = frame.take_texts();

    writer.begin_sync_update()?;
    {
        let mut stdout = writer.writer();
        crossterm::queue!(&mut stdout, cursor::MoveTo(0, 0))?;
    }
    writer.draw(
        &frame,
        DrawParams::clamped(geometry.columns, geometry.rows - 1),
    )?;

    let mut status = format!("page {}/{}", presenter.page() + 1, page_count);
    for (_, text) in &texts {
        status.push_str(" | ");
        status.push_str(text);
    }
    write_status_line(writer.writer(), (geometry.rows - 1) as u16, &status)?;
    writer.end_sync_update()?;
    Ok(())
}

fn init_logging(project_dirs: &ProjectDirs) -> Result<WorkerGuard> {
    let log_dir = project_dirs.data_local_dir().join("logs");
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, "slidepdf.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    Ok(guard)
}
