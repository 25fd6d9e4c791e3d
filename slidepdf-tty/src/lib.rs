use std::io::{self, Write};

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind},
    terminal::{Clear, ClearType},
};
use png::{BitDepth, ColorType, Encoder};
use slidepdf_core::{Color, FrameBuffer};

/// What a terminal input means to the presentation. Mouse coordinates are
/// terminal cells; the shell scales them to frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    PreviousPage,
    NextPage,
    PageUp,
    PageDown,
    FirstPage,
    LastPage,
    Confirm,
    ToggleWhite,
    ToggleBlack,
    ToggleThumbnails,
    ToggleTimer,
    ResetTimer,
    ClearScribble,
    SetLineWidth(u32),
    SetLineColor(Color),
    Clicked { x: i32, y: i32 },
    DrawLine { x1: i32, y1: i32, x2: i32, y2: i32 },
    EraseLine { x1: i32, y1: i32, x2: i32, y2: i32 },
    Quit,
    None,
}

/// Translates crossterm events into [`UiEvent`]s, tracking the mouse-drawing
/// toggle and the running stroke position between drag events.
#[derive(Debug, Default)]
pub struct EventMapper {
    mouse_drawing: bool,
    stroke: Option<(i32, i32)>,
}

impl EventMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mouse_drawing(&self) -> bool {
        self.mouse_drawing
    }

    pub fn map_event(&mut self, event: Event) -> UiEvent {
        match event {
            Event::Key(KeyEvent { code, .. }) => self.map_key(code),
            Event::Mouse(mouse) => self.map_mouse(mouse),
            _ => UiEvent::None,
        }
    }

    fn map_key(&mut self, code: KeyCode) -> UiEvent {
        match code {
            KeyCode::Left => UiEvent::PreviousPage,
            KeyCode::Right => UiEvent::NextPage,
            KeyCode::Up | KeyCode::PageUp => UiEvent::PageUp,
            KeyCode::Down | KeyCode::PageDown => UiEvent::PageDown,
            KeyCode::Home => UiEvent::FirstPage,
            KeyCode::End => UiEvent::LastPage,
            KeyCode::Enter | KeyCode::Char(' ') => UiEvent::Confirm,
            KeyCode::Tab => UiEvent::ToggleThumbnails,
            KeyCode::Esc | KeyCode::Char('q') => UiEvent::Quit,
            KeyCode::Char('d') => {
                self.mouse_drawing = !self.mouse_drawing;
                self.stroke = None;
                UiEvent::None
            }
            KeyCode::Char('c') => UiEvent::ClearScribble,
            KeyCode::Char('w') => UiEvent::ToggleWhite,
            KeyCode::Char('b') => UiEvent::ToggleBlack,
            KeyCode::Char('t') => UiEvent::ToggleTimer,
            KeyCode::Char('r') => UiEvent::ResetTimer,
            KeyCode::Char('1') => UiEvent::SetLineWidth(1),
            KeyCode::Char('2') => UiEvent::SetLineWidth(3),
            KeyCode::Char('3') => UiEvent::SetLineWidth(5),
            KeyCode::Char('4') => UiEvent::SetLineWidth(7),
            KeyCode::Char('5') => UiEvent::SetLineWidth(10),
            KeyCode::Char('6') => UiEvent::SetLineColor(Color::BLACK),
            KeyCode::Char('7') => UiEvent::SetLineColor(Color::RED),
            KeyCode::Char('8') => UiEvent::SetLineColor(Color::BLUE),
            KeyCode::Char('9') => UiEvent::SetLineColor(Color::GREEN),
            KeyCode::Char('0') => UiEvent::SetLineColor(Color::WHITE),
            _ => UiEvent::None,
        }
    }

    fn map_mouse(&mut self, mouse: MouseEvent) -> UiEvent {
        let position = (mouse.column as i32, mouse.row as i32);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.mouse_drawing => {
                self.stroke = Some(position);
                UiEvent::None
            }
            MouseEventKind::Down(MouseButton::Left) => UiEvent::Clicked {
                x: position.0,
                y: position.1,
            },
            MouseEventKind::Down(MouseButton::Right) if self.mouse_drawing => {
                self.stroke = Some(position);
                UiEvent::None
            }
            MouseEventKind::Drag(MouseButton::Left) if self.mouse_drawing => {
                let Some((x1, y1)) = self.stroke.replace(position) else {
                    return UiEvent::None;
                };
                UiEvent::DrawLine {
                    x1,
                    y1,
                    x2: position.0,
                    y2: position.1,
                }
            }
            MouseEventKind::Drag(MouseButton::Right) if self.mouse_drawing => {
                let Some((x1, y1)) = self.stroke.replace(position) else {
                    return UiEvent::None;
                };
                UiEvent::EraseLine {
                    x1,
                    y1,
                    x2: position.0,
                    y2: position.1,
                }
            }
            MouseEventKind::Up(_) => {
                self.stroke = None;
                UiEvent::None
            }
            _ => UiEvent::None,
        }
    }
}

pub struct DrawParams {
    pub columns: u32,
    pub rows: u32,
}

impl DrawParams {
    pub fn clamped(columns: u32, rows: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }
}

/// Pushes frames to the terminal over the kitty graphics protocol.
pub struct KittyImageWriter<W: Write> {
    writer: W,
    image_id: u32,
    placement_id: u32,
}

impl<W: Write> KittyImageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            image_id: 1,
            placement_id: 1,
        }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn draw(&mut self, frame: &FrameBuffer, params: DrawParams) -> Result<()> {
        let mut buffer = Vec::new();
        let mut encoder = Encoder::new(&mut buffer, frame.width(), frame.height());
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(frame.pixels())?;
        writer.finish()?;

        let encoded = BASE64.encode(&buffer);
        let mut chunks = encoded.as_bytes().chunks(4096).peekable();
        let mut first = true;

        while let Some(chunk) = chunks.next() {
            let more = chunks.peek().is_some();
            if first {
                write!(
                    self.writer,
                    "\u{1b}_Ga=T,f=100,C=1,q=2,i={},p={},c={},r={},s={},v={},z=-1,m={}",
                    self.image_id,
                    self.placement_id,
                    params.columns,
                    params.rows,
                    frame.width(),
                    frame.height(),
                    if more { 1 } else { 0 }
                )?;
                first = false;
            } else {
                write!(self.writer, "\u{1b}_Gm={},q=2", if more { 1 } else { 0 })?;
            }
            if !chunk.is_empty() {
                self.writer.write_all(b";")?;
                self.writer.write_all(chunk)?;
            }
            write!(self.writer, "\u{1b}\\")?;
        }

        self.writer.flush()?;
        Ok(())
    }

    pub fn begin_sync_update(&mut self) -> Result<()> {
        write!(self.writer, "\u{1b}[?2026h")?;
        Ok(())
    }

    /// Disables synchronized updates; the terminal renders all buffered
    /// changes at once.
    pub fn end_sync_update(&mut self) -> Result<()> {
        write!(self.writer, "\u{1b}[?2026l")?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn clear_all(&mut self) -> Result<()> {
        crossterm::execute!(
            &mut self.writer,
            Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(())
    }
}

/// Rewrites one terminal row with `label`.
pub fn write_status_line<W: Write>(writer: &mut W, row: u16, label: &str) -> io::Result<()> {
    crossterm::queue!(writer, cursor::MoveTo(0, row), Clear(ClearType::CurrentLine))?;
    write!(writer, "{}", label)?;
    writer.flush()
}
