// SPDX-License-Identifier: MIT
//
// keel — a small terminal text editor.
//
// This is the main binary that wires together the two crates:
//
//   keel-term → raw mode, key decoding, ANSI emission
//   keel-core → document, cursor, highlighting, search, viewport
//
// The Editor struct owns one document and one cursor and drives both from
// a blocking key loop. Each keypress flows through:
//
//   stdin → Keys (byte FSM) → process_keypress → document/cursor mutation
//   refresh → scroll → draw rows/status/message → one write to stdout
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status bar (inverted)        │  ← 1 row
//   ├──────────────────────────────┤
//   │ message / prompt line        │  ← 1 row
//   └──────────────────────────────┘
//
// The binary also owns the collaborator duties the core refuses: file
// load/save, the filename → grammar registry, status text, and saving the
// cursor/scroll position around a cancelled search.

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;

use keel_core::cursor::Cursor;
use keel_core::document::Document;
use keel_core::grammar::{Grammar, GrammarFlags};
use keel_core::highlight::HighlightClass;
use keel_core::search::{SearchEngine, SearchStep};
use keel_core::viewport::Viewport;

use keel_term::ansi;
use keel_term::input::{KeyCode, Keys};
use keel_term::terminal::{Size, Terminal};

// ─── Constants ──────────────────────────────────────────────────────────────

/// Shown in the welcome banner.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Consecutive Ctrl-Q presses required to discard unsaved changes.
const QUIT_TIMES: u32 = 3;

/// How long a status message stays on screen.
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Language registry ──────────────────────────────────────────────────────

/// One registry entry: a grammar and the file extensions that select it.
struct Language {
    grammar: Grammar,
    extensions: &'static [&'static str],
}

static LANGUAGES: &[Language] = &[
    Language {
        grammar: Grammar {
            name: "c",
            keywords: &[
                "switch", "if", "while", "for", "break", "continue", "return", "else",
                "struct", "union", "typedef", "static", "enum", "class", "case",
                "int|", "long|", "double|", "float|", "char|", "unsigned|", "signed|",
                "void|",
            ],
            comment_start: "//",
            flags: GrammarFlags::NUMBERS.union(GrammarFlags::STRINGS),
        },
        extensions: &["c", "h", "cpp"],
    },
    Language {
        grammar: Grammar {
            name: "rust",
            keywords: &[
                "fn", "let", "mut", "if", "else", "match", "while", "for", "loop",
                "break", "continue", "return", "pub", "use", "mod", "impl", "trait",
                "struct", "enum", "where", "unsafe", "as", "in", "ref", "move",
                "const|", "static|", "type|", "u8|", "u16|", "u32|", "u64|", "usize|",
                "i8|", "i16|", "i32|", "i64|", "isize|", "f32|", "f64|", "bool|",
                "char|", "str|", "String|", "Vec|", "Option|", "Result|", "Self|",
            ],
            comment_start: "//",
            flags: GrammarFlags::NUMBERS.union(GrammarFlags::STRINGS),
        },
        extensions: &["rs"],
    },
];

/// Resolve a grammar from a file path's extension. The core never does
/// this itself — the resolved grammar is handed to the document.
fn detect(path: &Path) -> Option<Grammar> {
    let ext = path.extension()?.to_str()?;
    LANGUAGES
        .iter()
        .find(|lang| lang.extensions.contains(&ext))
        .map(|lang| lang.grammar)
}

// ─── Highlight colors ───────────────────────────────────────────────────────

/// SGR foreground code for a highlight class. `None` means the terminal's
/// default foreground.
const fn color_for(class: HighlightClass) -> Option<u8> {
    match class {
        HighlightClass::Normal => None,
        HighlightClass::Comment => Some(36),
        HighlightClass::Keyword1 => Some(33),
        HighlightClass::Keyword2 => Some(32),
        HighlightClass::String => Some(35),
        HighlightClass::Number => Some(31),
        HighlightClass::Match => Some(34),
    }
}

// ─── Status message ─────────────────────────────────────────────────────────

/// A timed status-bar message.
struct StatusMessage {
    text: String,
    time: Instant,
}

impl StatusMessage {
    fn new() -> Self {
        Self {
            text: String::new(),
            time: Instant::now(),
        }
    }

    fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.time = Instant::now();
    }

    fn visible(&self) -> bool {
        !self.text.is_empty() && self.time.elapsed() < MESSAGE_TIMEOUT
    }
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editor application state: one document, one cursor, one window.
///
/// Generic over the key source and output sink so tests can drive it with
/// scripted bytes and inspect the frames it writes.
struct Editor<R, W> {
    keys: Keys<R>,
    out: W,
    document: Document,
    cursor: Cursor,
    viewport: Viewport,
    search: SearchEngine,
    filename: Option<PathBuf>,
    status: StatusMessage,
    quit_times: u32,
}

impl<R: Read, W: Write> Editor<R, W> {
    fn new(keys: Keys<R>, out: W, size: Size) -> Self {
        // Two rows reserved: status bar and message line.
        let viewport = Viewport::new(size.rows.saturating_sub(2), size.cols);
        Self {
            keys,
            out,
            document: Document::new(),
            cursor: Cursor::new(),
            viewport,
            search: SearchEngine::new(),
            filename: None,
            status: StatusMessage::new(),
            quit_times: QUIT_TIMES,
        }
    }

    /// Track a terminal resize.
    fn sync_size(&mut self, size: Size) {
        self.viewport
            .resize(size.rows.saturating_sub(2), size.cols);
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status.set(text);
    }

    // ── File I/O ────────────────────────────────────────────────────

    /// Load a file into the document and resolve its grammar.
    fn open(&mut self, path: &Path) -> io::Result<()> {
        let text = fs::read_to_string(path)?;
        self.document = Document::from_lines(text.lines().map(String::from));
        self.document.set_grammar(detect(path));
        self.filename = Some(path.to_path_buf());
        self.cursor = Cursor::new();
        tracing::info!(
            path = %path.display(),
            rows = self.document.row_count(),
            filetype = self.document.grammar().map_or("none", |g| g.name),
            "opened file"
        );
        Ok(())
    }

    /// Write the document to its file, prompting for a name when none is
    /// set. I/O failures land in the status bar, not in the caller.
    fn save(&mut self) -> io::Result<()> {
        let path = if let Some(path) = &self.filename {
            path.clone()
        } else {
            let Some(name) = self.prompt("Save as: ")? else {
                self.set_status("Save aborted");
                return Ok(());
            };
            let path = PathBuf::from(name);
            self.document.set_grammar(detect(&path));
            self.filename = Some(path.clone());
            path
        };

        let text = self.document.to_text();
        match fs::write(&path, &text) {
            Ok(()) => {
                self.document.mark_saved();
                self.set_status(format!("{} bytes written to disk", text.len()));
                tracing::info!(path = %path.display(), bytes = text.len(), "saved file");
            }
            Err(err) => self.set_status(format!("Can't save! I/O error: {err}")),
        }
        Ok(())
    }

    // ── Prompt & search ─────────────────────────────────────────────

    /// Line-input prompt on the message bar. Enter confirms (non-empty),
    /// Escape cancels.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        let mut input = String::new();
        loop {
            self.set_status(format!("{label}{input} (ESC to cancel)"));
            self.refresh()?;

            match self.keys.next_key()? {
                KeyCode::Enter if !input.is_empty() => {
                    self.set_status("");
                    return Ok(Some(input));
                }
                KeyCode::Escape => {
                    self.set_status("");
                    return Ok(None);
                }
                KeyCode::Backspace | KeyCode::Delete | KeyCode::Ctrl('h') => {
                    input.pop();
                }
                KeyCode::Char(c) if !c.is_control() => input.push(c),
                _ => {}
            }
        }
    }

    /// Incremental search session. The engine owns the match state and the
    /// highlight overlay; this loop owns the query text and the promise to
    /// put the cursor and scroll position back when the user cancels.
    fn find(&mut self) -> io::Result<()> {
        let saved_cursor = self.cursor;
        let saved_row_offset = self.viewport.row_offset;
        let saved_col_offset = self.viewport.col_offset;

        self.search.reset();
        let mut query = String::new();

        loop {
            self.set_status(format!("Search: {query} (Use ESC/Arrows/Enter)"));
            self.refresh()?;

            let step = match self.keys.next_key()? {
                KeyCode::Enter => {
                    // Confirm: drop the overlay, keep the cursor on the match.
                    self.end_search(&query);
                    break;
                }
                KeyCode::Escape => {
                    // Cancel: drop the overlay and restore where we were.
                    self.end_search(&query);
                    self.cursor = saved_cursor;
                    self.viewport.row_offset = saved_row_offset;
                    self.viewport.col_offset = saved_col_offset;
                    break;
                }
                KeyCode::Right | KeyCode::Down => SearchStep::Next,
                KeyCode::Left | KeyCode::Up => SearchStep::Prev,
                KeyCode::Backspace | KeyCode::Ctrl('h') => {
                    query.pop();
                    SearchStep::Edited
                }
                KeyCode::Char(c) if !c.is_control() => {
                    query.push(c);
                    SearchStep::Edited
                }
                _ => SearchStep::Edited,
            };

            self.search
                .update(&mut self.document, &mut self.cursor, &query, step);
        }

        self.set_status("");
        Ok(())
    }

    fn end_search(&mut self, query: &str) {
        self.search
            .update(&mut self.document, &mut self.cursor, query, SearchStep::Cancel);
        tracing::debug!(query, "search session ended");
    }

    // ── Painting ────────────────────────────────────────────────────

    /// Compose one frame and write it in a single syscall-sized chunk.
    fn refresh(&mut self) -> io::Result<()> {
        let rendered_col = self
            .document
            .row(self.cursor.row)
            .map_or(0, |row| row.raw_to_rendered(self.cursor.col));
        self.viewport.scroll(self.cursor.row, rendered_col);

        let mut frame: Vec<u8> = Vec::new();
        ansi::cursor_hide(&mut frame)?;
        ansi::cursor_home(&mut frame)?;

        self.draw_rows(&mut frame)?;
        self.draw_status_bar(&mut frame)?;
        self.draw_message_bar(&mut frame)?;

        ansi::cursor_to(
            &mut frame,
            rendered_col.saturating_sub(self.viewport.col_offset),
            self.cursor.row.saturating_sub(self.viewport.row_offset),
        )?;
        ansi::cursor_show(&mut frame)?;

        self.out.write_all(&frame)?;
        self.out.flush()
    }

    fn draw_rows(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        for y in 0..self.viewport.rows {
            let file_row = y + self.viewport.row_offset;

            if let Some(row) = self.document.row(file_row) {
                self.draw_text_row(frame, row.render(), row.highlight())?;
            } else if self.document.is_empty() && y == self.viewport.rows / 3 {
                self.draw_welcome(frame)?;
            } else {
                frame.push(b'~');
            }

            ansi::clear_line(frame)?;
            frame.extend_from_slice(b"\r\n");
        }
        Ok(())
    }

    /// Draw one document row: the visible window of its rendered text,
    /// switching SGR color only when the highlight class changes.
    fn draw_text_row(
        &self,
        frame: &mut Vec<u8>,
        render: &str,
        highlight: &[HighlightClass],
    ) -> io::Result<()> {
        let start = self.viewport.col_offset.min(render.len());
        let end = (start + self.viewport.cols).min(render.len());

        let mut current: Option<u8> = None;
        for (byte, &class) in render.as_bytes()[start..end]
            .iter()
            .zip(&highlight[start..end])
        {
            let color = color_for(class);
            if color != current {
                match color {
                    Some(code) => ansi::fg(frame, code)?,
                    None => ansi::fg_default(frame)?,
                }
                current = color;
            }
            frame.push(*byte);
        }

        if current.is_some() {
            ansi::fg_default(frame)?;
        }
        Ok(())
    }

    fn draw_welcome(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        let mut welcome = format!("Keel editor -- version {VERSION}");
        welcome.truncate(self.viewport.cols);

        let mut padding = (self.viewport.cols - welcome.len()) / 2;
        if padding > 0 {
            frame.push(b'~');
            padding -= 1;
        }
        frame.extend(std::iter::repeat_n(b' ', padding));
        frame.extend_from_slice(welcome.as_bytes());
        Ok(())
    }

    fn draw_status_bar(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        ansi::invert(frame)?;

        let name = self
            .filename
            .as_deref()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
        let modified = if self.document.is_dirty() {
            " (modified)"
        } else {
            ""
        };
        let mut left = format!("{name} - {} lines{modified}", self.document.row_count());
        left.truncate(self.viewport.cols);

        let filetype = self.document.grammar().map_or("no ft", |g| g.name);
        let right = format!(
            "{filetype} | {}/{}",
            self.cursor.row + 1,
            self.document.row_count()
        );

        frame.extend_from_slice(left.as_bytes());
        let mut len = left.len();
        while len < self.viewport.cols {
            if self.viewport.cols - len == right.len() {
                frame.extend_from_slice(right.as_bytes());
                break;
            }
            frame.push(b' ');
            len += 1;
        }

        ansi::reset(frame)?;
        frame.extend_from_slice(b"\r\n");
        Ok(())
    }

    fn draw_message_bar(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        ansi::clear_line(frame)?;
        if self.status.visible() {
            let mut text = self.status.text.clone();
            text.truncate(self.viewport.cols);
            frame.extend_from_slice(text.as_bytes());
        }
        Ok(())
    }

    // ── Key dispatch ────────────────────────────────────────────────

    /// Handle one keypress. Returns `false` when the editor should exit.
    fn process_keypress(&mut self) -> io::Result<bool> {
        let key = self.keys.next_key()?;

        match key {
            KeyCode::Ctrl('q') => {
                if self.document.is_dirty() && self.quit_times > 0 {
                    self.set_status(format!(
                        "WARNING!!! File has unsaved changes. \
                         Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Ok(true);
                }
                return Ok(false);
            }

            KeyCode::Ctrl('s') => self.save()?,
            KeyCode::Ctrl('f') => self.find()?,

            KeyCode::Enter => self.document.insert_newline(&mut self.cursor),
            KeyCode::Backspace | KeyCode::Ctrl('h') => {
                self.document.delete_char(&mut self.cursor);
            }
            KeyCode::Delete => {
                // Forward delete: step onto the next character, then
                // backspace over it.
                self.cursor.move_right(&self.document);
                self.document.delete_char(&mut self.cursor);
            }

            KeyCode::Up => self.cursor.move_up(&self.document),
            KeyCode::Down => self.cursor.move_down(&self.document),
            KeyCode::Left => self.cursor.move_left(&self.document),
            KeyCode::Right => self.cursor.move_right(&self.document),
            KeyCode::Home => self.cursor.move_home(),
            KeyCode::End => self.cursor.move_end(&self.document),
            KeyCode::PageUp | KeyCode::PageDown => self.page_move(key),

            // Ctrl-L traditionally forces a repaint; the next refresh
            // repaints everything anyway.
            KeyCode::Escape | KeyCode::Ctrl('l') => {}

            KeyCode::Char(c) => self.document.insert_char(&mut self.cursor, c),
            KeyCode::Ctrl(_) => {}
        }

        self.quit_times = QUIT_TIMES;
        Ok(true)
    }

    /// Page keys: jump the cursor to the window edge, then step one full
    /// window height.
    fn page_move(&mut self, key: KeyCode) {
        if key == KeyCode::PageUp {
            self.cursor.row = self.viewport.row_offset;
        } else {
            self.cursor.row = (self.viewport.row_offset + self.viewport.rows)
                .saturating_sub(1)
                .min(self.document.row_count());
        }
        self.cursor.clamp_col(&self.document);

        for _ in 0..self.viewport.rows {
            if key == KeyCode::PageUp {
                self.cursor.move_up(&self.document);
            } else {
                self.cursor.move_down(&self.document);
            }
        }
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Route tracing output to the file named by `KEEL_LOG`, if set. The
/// terminal owns stdout, so logs can never go there.
fn init_tracing() -> anyhow::Result<()> {
    let Ok(path) = env::var("KEEL_LOG") else {
        return Ok(());
    };
    let file = fs::File::create(&path)
        .with_context(|| format!("failed to create log file {path}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let mut terminal = Terminal::new();
    terminal.enter().context("failed to enter raw mode")?;

    let mut editor = Editor::new(Keys::new(io::stdin()), io::stdout(), terminal.size());

    if let Some(arg) = env::args_os().nth(1) {
        let path = Path::new(&arg);
        editor
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
    }

    editor.set_status("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");

    loop {
        editor.sync_size(terminal.refresh_size());
        editor.refresh()?;
        if !editor.process_keypress()? {
            break;
        }
    }

    terminal.leave()?;
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    type TestEditor = Editor<io::Cursor<Vec<u8>>, Vec<u8>>;

    /// Build an editor over the given lines, with `script` queued on the
    /// key source. Output frames collect into a Vec.
    fn editor_with(lines: &[&str], script: &[u8]) -> TestEditor {
        let keys = Keys::new(io::Cursor::new(script.to_vec()));
        let mut editor = Editor::new(keys, Vec::new(), Size { cols: 80, rows: 24 });
        editor.document = Document::from_lines(lines.iter().copied());
        editor
    }

    /// Run `count` keypresses.
    fn feed(editor: &mut TestEditor, count: usize) {
        for _ in 0..count {
            editor.process_keypress().unwrap();
        }
    }

    fn text(editor: &TestEditor) -> String {
        editor.document.to_text()
    }

    // ── Language registry ─────────────────────────────────────────────

    #[test]
    fn detect_c_family() {
        for name in ["main.c", "defs.h", "app.cpp"] {
            let grammar = detect(Path::new(name)).unwrap();
            assert_eq!(grammar.name, "c");
        }
    }

    #[test]
    fn detect_rust() {
        assert_eq!(detect(Path::new("lib.rs")).unwrap().name, "rust");
    }

    #[test]
    fn detect_unknown() {
        assert!(detect(Path::new("Makefile")).is_none());
        assert!(detect(Path::new("notes.txt")).is_none());
        assert!(detect(Path::new("no_extension")).is_none());
    }

    // ── Highlight colors ──────────────────────────────────────────────

    #[test]
    fn color_mapping() {
        assert_eq!(color_for(HighlightClass::Normal), None);
        assert_eq!(color_for(HighlightClass::Comment), Some(36));
        assert_eq!(color_for(HighlightClass::Keyword1), Some(33));
        assert_eq!(color_for(HighlightClass::Keyword2), Some(32));
        assert_eq!(color_for(HighlightClass::String), Some(35));
        assert_eq!(color_for(HighlightClass::Number), Some(31));
        assert_eq!(color_for(HighlightClass::Match), Some(34));
    }

    // ── Editing through the dispatch loop ─────────────────────────────

    #[test]
    fn typing_inserts_characters() {
        let mut e = editor_with(&[], b"hi");
        feed(&mut e, 2);
        assert_eq!(text(&e), "hi\n");
        assert_eq!(e.cursor, Cursor { row: 0, col: 2 });
        assert!(e.document.is_dirty());
    }

    #[test]
    fn enter_splits_line() {
        let mut e = editor_with(&["abcd"], b"\x1b[C\x1b[C\r");
        feed(&mut e, 3); // right, right, enter
        assert_eq!(text(&e), "ab\ncd\n");
        assert_eq!(e.cursor, Cursor { row: 1, col: 0 });
    }

    #[test]
    fn backspace_deletes_and_merges() {
        let mut e = editor_with(&["ab", "cd"], &[0x1b, b'[', b'B', 0x7f]);
        feed(&mut e, 2); // down, backspace at col 0 → merge
        assert_eq!(text(&e), "abcd\n");
        assert_eq!(e.cursor, Cursor { row: 0, col: 2 });
    }

    #[test]
    fn delete_removes_forward() {
        let mut e = editor_with(&["abc"], b"\x1b[3~");
        feed(&mut e, 1);
        assert_eq!(text(&e), "bc\n");
        assert_eq!(e.cursor, Cursor { row: 0, col: 0 });
    }

    #[test]
    fn home_and_end_keys() {
        let mut e = editor_with(&["hello"], b"\x1b[F\x1b[H");
        feed(&mut e, 1); // End
        assert_eq!(e.cursor.col, 5);
        feed(&mut e, 1); // Home
        assert_eq!(e.cursor.col, 0);
    }

    #[test]
    fn page_down_jumps_a_window() {
        let lines: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut e = editor_with(&refs, b"\x1b[6~");
        feed(&mut e, 1);
        // Window is 22 text rows; the cursor lands one window down.
        assert_eq!(e.cursor.row, 43);
    }

    // ── Quit guard ────────────────────────────────────────────────────

    #[test]
    fn clean_document_quits_immediately() {
        let mut e = editor_with(&["x"], &[0x11]);
        assert!(!e.process_keypress().unwrap());
    }

    #[test]
    fn dirty_document_needs_repeated_quit() {
        let mut e = editor_with(&[], &[b'x', 0x11, 0x11, 0x11, 0x11]);
        feed(&mut e, 1); // make it dirty
        assert!(e.process_keypress().unwrap());
        assert!(e.process_keypress().unwrap());
        assert!(e.process_keypress().unwrap());
        assert!(!e.process_keypress().unwrap());
    }

    #[test]
    fn other_key_resets_quit_countdown() {
        let mut e = editor_with(&[], &[b'x', 0x11, b'y', 0x11]);
        feed(&mut e, 3);
        assert_eq!(e.quit_times, QUIT_TIMES);
        // The countdown starts over.
        assert!(e.process_keypress().unwrap());
    }

    // ── Search session ────────────────────────────────────────────────

    #[test]
    fn search_confirm_leaves_cursor_on_match() {
        // Ctrl-F, "foo", ArrowDown (next match), Enter.
        let mut e = editor_with(&["foo bar", "baz foo"], b"\x06foo\x1b[B\r");
        feed(&mut e, 1);
        assert_eq!(e.cursor, Cursor { row: 1, col: 4 });
        // No overlay residue after the session.
        assert!(
            e.document
                .rows()
                .iter()
                .all(|r| !r.highlight().contains(&HighlightClass::Match))
        );
    }

    #[test]
    fn search_cancel_restores_cursor() {
        // Move right twice, then Ctrl-F "foo" and Escape. The script
        // running dry after the ESC byte stands in for the read timeout.
        let mut e = editor_with(&["xx foo", "yy"], b"\x1b[C\x1b[C\x06foo\x1b");
        feed(&mut e, 3);
        assert_eq!(e.cursor, Cursor { row: 0, col: 2 });
        assert!(
            e.document
                .rows()
                .iter()
                .all(|r| !r.highlight().contains(&HighlightClass::Match))
        );
    }

    #[test]
    fn search_does_not_dirty_document() {
        let mut e = editor_with(&["foo"], b"\x06foo\r");
        feed(&mut e, 1);
        assert!(!e.document.is_dirty());
    }

    // ── Frames ────────────────────────────────────────────────────────

    #[test]
    fn refresh_emits_full_frame() {
        let mut e = editor_with(&["hello"], b"");
        e.refresh().unwrap();
        let frame = String::from_utf8(e.out.clone()).unwrap();

        assert!(frame.starts_with("\x1b[?25l\x1b[H"), "hide cursor, home");
        assert!(frame.contains("hello"));
        assert!(frame.contains("\x1b[7m"), "status bar inversion");
        assert!(frame.contains("[No Name]"));
        assert!(frame.ends_with("\x1b[?25h"), "cursor shown last");
    }

    #[test]
    fn empty_document_shows_welcome() {
        let mut e = editor_with(&[], b"");
        e.refresh().unwrap();
        let frame = String::from_utf8(e.out.clone()).unwrap();
        assert!(frame.contains("Keel editor -- version"));
    }

    #[test]
    fn keyword_row_emits_color_changes() {
        let mut e = editor_with(&["int x = 1;"], b"");
        e.document.set_grammar(detect(Path::new("t.c")));
        e.refresh().unwrap();
        let frame = String::from_utf8(e.out.clone()).unwrap();

        assert!(frame.contains("\x1b[32mint"), "secondary keyword color");
        assert!(frame.contains("\x1b[31m1"), "number color");
    }

    #[test]
    fn status_bar_shows_filetype_and_position() {
        let mut e = editor_with(&["a", "b"], b"");
        e.document.set_grammar(detect(Path::new("t.rs")));
        e.refresh().unwrap();
        let frame = String::from_utf8(e.out.clone()).unwrap();
        assert!(frame.contains("rust | 1/2"));
    }

    #[test]
    fn horizontal_scroll_windows_long_rows() {
        let long = "x".repeat(200);
        let mut e = editor_with(&[&long], b"");
        e.cursor.col = 150;
        e.refresh().unwrap();
        // Cursor kept in view: col_offset = 150 - 80 + 1.
        assert_eq!(e.viewport.col_offset, 71);
    }

    // ── Save ──────────────────────────────────────────────────────────

    #[test]
    fn save_writes_file_and_clears_dirty() {
        let dir = std::env::temp_dir().join("keel_test_save");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("out.txt");

        let mut e = editor_with(&[], b"hi\x13");
        e.filename = Some(path.clone());
        feed(&mut e, 3); // 'h', 'i', Ctrl-S
        assert!(!e.document.is_dirty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hi\n");
        assert!(e.status.text.contains("3 bytes written"));

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn save_as_prompt_escape_aborts() {
        let mut e = editor_with(&[], &[b'x', 0x13, 0x1b]);
        feed(&mut e, 2); // 'x', Ctrl-S → prompt consumes the ESC
        assert!(e.filename.is_none());
        assert!(e.document.is_dirty());
        assert_eq!(e.status.text, "Save aborted");
    }

    // ── Open ──────────────────────────────────────────────────────────

    #[test]
    fn open_load_save_round_trip() {
        let dir = std::env::temp_dir().join("keel_test_open");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("file.c");
        fs::write(&path, "int main() {\n\treturn 0;\n}\n").unwrap();

        let mut e = editor_with(&[], b"");
        e.open(&path).unwrap();
        assert_eq!(e.document.row_count(), 3);
        assert_eq!(e.document.grammar().unwrap().name, "c");
        assert!(!e.document.is_dirty());
        assert_eq!(e.document.to_text(), "int main() {\n\treturn 0;\n}\n");

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn open_missing_file_errors() {
        let mut e = editor_with(&[], b"");
        assert!(e.open(Path::new("/nonexistent/keel.txt")).is_err());
    }
}
