//! File system commands and the two that open files elsewhere: `xdg-open`
//! and `vim`.

use std::rc::Rc;
use std::sync::LazyLock;

use dt_editor::BufferSpec;
use regex::Regex;

use super::{CommandTable, Outcome};
use crate::fs::{FsError, Node};
use crate::session::Session;

/// Entries `rm` asks about before deleting.
pub const PROTECTED: &[&str] = &["kernel", "system32"];

static URL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)^https?://").ok());

fn is_url(raw: &str) -> bool {
    URL.as_ref().is_some_and(|re| re.is_match(raw))
}

pub(super) fn register(table: &mut CommandTable) {
    table.insert("ls", ls);
    table.insert("cd", cd);
    table.insert("pwd", pwd);
    table.insert("mkdir", mkdir);
    table.insert("touch", touch);
    table.insert("cat", cat);
    table.insert("rm", rm);
    table.insert("xdg-open", xdg_open);
    table.insert("vim", vim);
}

// ---------------------------------------------------------------------------
// Navigation and listing
// ---------------------------------------------------------------------------

fn ls(session: &mut Session, args: &[&str]) -> Outcome {
    let fs = session.fs.borrow();
    let Some(&raw) = args.first() else {
        return Outcome::Text(match fs.list("") {
            Ok(names) => names.join("  "),
            Err(_) => "Not a directory".to_owned(),
        });
    };
    Outcome::Text(match fs.list(raw) {
        Ok(names) => names.join("  "),
        Err(FsError::NotADirectory(_)) => raw.to_owned(),
        Err(_) => format!("ls: cannot access '{raw}': No such file or directory"),
    })
}

fn cd(session: &mut Session, args: &[&str]) -> Outcome {
    let Some(&raw) = args.first() else {
        return Outcome::text("Usage: cd [directory]");
    };
    let mut fs = session.fs.borrow_mut();
    Outcome::Text(match fs.set_cwd(raw) {
        Ok(cwd) => format!("Moved to {}", cwd.join("/")),
        Err(_) => format!("cd: no such directory: {raw}"),
    })
}

fn pwd(session: &mut Session, _: &[&str]) -> Outcome {
    Outcome::Text(session.fs.borrow().cwd_string())
}

fn cat(session: &mut Session, args: &[&str]) -> Outcome {
    let Some(&raw) = args.first() else {
        return Outcome::text("Usage: cat [file]");
    };
    let fs = session.fs.borrow();
    Outcome::Text(match fs.read_file(raw) {
        Ok(content) => content.to_owned(),
        Err(_) => format!("cat: {raw}: No such file"),
    })
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

fn mkdir(session: &mut Session, args: &[&str]) -> Outcome {
    let Some(&raw) = args.first() else {
        return Outcome::text("Usage: mkdir [name]");
    };
    Outcome::Text(match session.fs.borrow_mut().create_dir(raw) {
        Ok(()) => format!("Directory \"{raw}\" created."),
        Err(FsError::AlreadyExists(_)) => "Directory already exists.".to_owned(),
        Err(_) => format!("mkdir: cannot create directory '{raw}': No such file or directory"),
    })
}

fn touch(session: &mut Session, args: &[&str]) -> Outcome {
    let Some(&raw) = args.first() else {
        return Outcome::text("Usage: touch [filename]");
    };
    Outcome::Text(match session.fs.borrow_mut().create_file(raw) {
        Ok(_) => format!("File \"{raw}\" created."),
        Err(_) => format!("touch: cannot touch '{raw}': No such file or directory"),
    })
}

fn rm(session: &mut Session, args: &[&str]) -> Outcome {
    let Some(&raw) = args.first() else {
        return Outcome::text("Usage: rm [name]");
    };
    let abs = session.fs.borrow().to_absolute(raw);
    if abs.len() < 2 {
        return Outcome::Text(format!("rm: {}", FsError::RemoveRoot));
    }
    if session.fs.borrow().resolve(&abs).is_none() {
        return Outcome::Text(format!(
            "rm: cannot remove '{raw}': No such file or directory"
        ));
    }

    let name = raw.to_owned();
    if abs.last().is_some_and(|last| PROTECTED.contains(&last.as_str())) {
        return Outcome::Confirm {
            message: format!("rm:\"{raw}\". Are you sure? (Y/N)"),
            perform: Box::new(move |session: &mut Session| {
                match session.fs.borrow_mut().remove(&abs) {
                    Ok(_) => format!("'{name}' removed. May the ducks be with you."),
                    Err(e) => format!("rm: {e}"),
                }
            }),
        };
    }

    Outcome::Text(match session.fs.borrow_mut().remove(&abs) {
        Ok(_) => format!("'{name}' removed."),
        Err(e) => format!("rm: {e}"),
    })
}

// ---------------------------------------------------------------------------
// xdg-open
// ---------------------------------------------------------------------------

/// MIME type from the file extension.
#[must_use]
pub fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" | "md" | "log" | "conf" | "json" | "yaml" | "yml" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn xdg_open(session: &mut Session, args: &[&str]) -> Outcome {
    let Some(&raw) = args.first() else {
        return Outcome::text("Usage: xdg-open [FILE|URL]");
    };

    if is_url(raw) {
        return Outcome::Text(match session.windows.open("browser", Some(raw)) {
            Ok(()) => format!("Opening URL: {raw}..."),
            Err(e) => format!("xdg-open: {e}"),
        });
    }

    let fs = session.fs.borrow();
    let abs = fs.to_absolute(raw);
    let Some(node) = fs.resolve(&abs).filter(|node| node.is_file()) else {
        return Outcome::Text(format!("xdg-open: \"{raw}\": No such file"));
    };

    let mime = node.mime().unwrap_or_else(|| guess_mime(raw));
    let is_pdf = mime == "application/pdf" || raw.to_ascii_lowercase().ends_with(".pdf");
    let has_body = node.src().is_some() || node.content().is_some_and(|c| !c.is_empty());
    if !((is_pdf && has_body) || mime.starts_with("text/")) {
        return Outcome::Text(format!("xdg-open: \"{raw}\": no application can open {mime}"));
    }

    let document = abs.join("/");
    drop(fs);
    Outcome::Text(match session.windows.open("pdfviewer", Some(&document)) {
        Ok(()) => format!("Opening \"{raw}\"..."),
        Err(e) => format!("xdg-open: {e}"),
    })
}

// ---------------------------------------------------------------------------
// vim
// ---------------------------------------------------------------------------

/// Open each argument as an editor buffer. Missing files are created empty
/// in their parent directory; saving writes back into the tree. A path
/// whose parent is not a directory opens as an unsaved scratch buffer.
fn vim(session: &mut Session, args: &[&str]) -> Outcome {
    let mut specs = Vec::with_capacity(args.len());
    for &raw in args {
        let abs = session.fs.borrow().to_absolute(raw);
        let mut fs = session.fs.borrow_mut();

        let parent_is_dir = abs.len() >= 2
            && fs
                .resolve(&abs[..abs.len() - 1])
                .is_some_and(Node::is_dir);
        if !parent_is_dir {
            specs.push(BufferSpec::new(raw, ""));
            continue;
        }

        let text = match fs.resolve(&abs) {
            Some(Node::File { content, .. }) => content.clone(),
            Some(Node::Directory { .. }) => {
                specs.push(BufferSpec::new(raw, ""));
                continue;
            }
            None => {
                if let Err(e) = fs.write_file(&abs, "") {
                    tracing::warn!(error = %e, path = raw, "vim: could not create file");
                }
                String::new()
            }
        };
        drop(fs);

        let shared = Rc::clone(&session.fs);
        specs.push(BufferSpec::new(raw, text).on_save(move |text| {
            if let Err(e) = shared.borrow_mut().write_file(&abs, text) {
                tracing::warn!(error = %e, "save failed");
            }
        }));
    }
    tracing::debug!(buffers = specs.len(), "vim");
    Outcome::Edit(specs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::testing::{run, session};
    use super::*;
    use crate::session::Session;

    fn dispatch(s: &mut Session, line: &str) -> Outcome {
        CommandTable::standard().dispatch(s, line).unwrap()
    }

    #[test]
    fn ls_cwd_and_args() {
        let mut s = session();
        let listing = run(&mut s, "ls");
        assert!(listing.contains("Documents  Downloads"));
        assert!(!listing.contains(".ssh"));
        assert_eq!(run(&mut s, "ls Documents/Notes"), "ideas.txt  todo.txt");
        assert_eq!(run(&mut s, "ls etc/motd"), "etc/motd");
        assert_eq!(
            run(&mut s, "ls ghost"),
            "ls: cannot access 'ghost': No such file or directory"
        );
    }

    #[test]
    fn cd_pwd() {
        let mut s = session();
        assert_eq!(run(&mut s, "cd"), "Usage: cd [directory]");
        assert_eq!(run(&mut s, "cd Documents"), "Moved to ~/Documents");
        assert_eq!(run(&mut s, "pwd"), "~/Documents");
        assert_eq!(run(&mut s, "cd ."), "Moved to ~/Documents");
        assert_eq!(run(&mut s, "cd .."), "Moved to ~");
        assert_eq!(run(&mut s, "cd .."), "Moved to ~");
        assert_eq!(run(&mut s, "cd ghost"), "cd: no such directory: ghost");
        assert_eq!(run(&mut s, "cd kernel"), "cd: no such directory: kernel");
        assert_eq!(run(&mut s, "cd ~/etc"), "Moved to ~/etc");
    }

    #[test]
    fn cat_files() {
        let mut s = session();
        assert_eq!(run(&mut s, "cat etc/motd"), "Welcome to LucasOS");
        assert_eq!(run(&mut s, "cat ghost"), "cat: ghost: No such file");
        assert_eq!(run(&mut s, "cat etc"), "cat: etc: No such file");
        assert_eq!(run(&mut s, "cat"), "Usage: cat [file]");
    }

    #[test]
    fn mkdir_and_touch() {
        let mut s = session();
        assert_eq!(run(&mut s, "mkdir"), "Usage: mkdir [name]");
        assert_eq!(run(&mut s, "mkdir work"), "Directory \"work\" created.");
        assert_eq!(run(&mut s, "mkdir work"), "Directory already exists.");
        assert_eq!(run(&mut s, "touch"), "Usage: touch [filename]");
        assert_eq!(run(&mut s, "touch work/a.txt"), "File \"work/a.txt\" created.");
        assert_eq!(run(&mut s, "ls work"), "a.txt");
        // touch keeps existing content.
        run(&mut s, "touch etc/motd");
        assert_eq!(run(&mut s, "cat etc/motd"), "Welcome to LucasOS");
    }

    #[test]
    fn rm_plain_entries() {
        let mut s = session();
        assert_eq!(run(&mut s, "rm"), "Usage: rm [name]");
        assert_eq!(run(&mut s, "rm Downloads"), "'Downloads' removed.");
        assert_eq!(
            run(&mut s, "rm Downloads"),
            "rm: cannot remove 'Downloads': No such file or directory"
        );
        assert_eq!(run(&mut s, "rm ~"), "rm: refusing to remove ~");
    }

    #[test]
    fn rm_protected_needs_confirmation() {
        let mut s = session();
        let Outcome::Confirm { message, perform } = dispatch(&mut s, "rm kernel") else {
            panic!("expected a confirmation");
        };
        assert_eq!(message, "rm:\"kernel\". Are you sure? (Y/N)");
        // Nothing happens until perform runs.
        assert!(s.fs.borrow().lookup("kernel").is_some());
        assert_eq!(perform(&mut s), "'kernel' removed. May the ducks be with you.");
        assert!(s.fs.borrow().lookup("kernel").is_none());
    }

    #[test]
    fn guess_mime_by_extension() {
        assert_eq!(guess_mime("cv.PDF"), "application/pdf");
        assert_eq!(guess_mime("notes.md"), "text/plain");
        assert_eq!(guess_mime("a.yml"), "text/plain");
        assert_eq!(guess_mime("a.png"), "application/octet-stream");
        assert_eq!(guess_mime("Makefile"), "application/octet-stream");
    }

    #[test]
    fn xdg_open_urls_and_files() {
        let mut s = session();
        assert_eq!(run(&mut s, "xdg-open"), "Usage: xdg-open [FILE|URL]");
        assert_eq!(
            run(&mut s, "xdg-open HTTPS://example.com"),
            "Opening URL: HTTPS://example.com..."
        );
        assert_eq!(
            run(&mut s, "xdg-open Documents/CV_Lucas_Colaco.pdf"),
            "Opening \"Documents/CV_Lucas_Colaco.pdf\"..."
        );
        assert_eq!(run(&mut s, "xdg-open etc/motd"), "Opening \"etc/motd\"...");
        assert_eq!(
            run(&mut s, "xdg-open ghost.pdf"),
            "xdg-open: \"ghost.pdf\": No such file"
        );
        assert_eq!(
            run(&mut s, "xdg-open Documents"),
            "xdg-open: \"Documents\": No such file"
        );
        assert_eq!(
            run(&mut s, "xdg-open Pictures/duck.png"),
            "xdg-open: \"Pictures/duck.png\": no application can open image/png"
        );
    }

    #[test]
    fn vim_without_args_opens_scratch() {
        let mut s = session();
        let Outcome::Edit(specs) = dispatch(&mut s, "vim") else {
            panic!("expected edit");
        };
        assert!(specs.is_empty());
    }

    #[test]
    fn vim_creates_missing_files_and_saves_back() {
        let mut s = session();
        let Outcome::Edit(specs) = dispatch(&mut s, "vim Documents/new.txt etc/motd") else {
            panic!("expected edit");
        };
        assert_eq!(specs.len(), 2);
        assert_eq!(s.fs.borrow().read_file("Documents/new.txt").unwrap(), "");

        let mut buffers: Vec<_> = specs
            .into_iter()
            .map(dt_editor::EditorBuffer::from_spec)
            .collect();
        assert_eq!(buffers[1].text(), "Welcome to LucasOS");

        buffers[0].insert(dt_editor::Position::ZERO, "hello");
        buffers[0].save();
        assert_eq!(s.fs.borrow().read_file("Documents/new.txt").unwrap(), "hello");
    }

    #[test]
    fn vim_with_missing_parent_is_unsaved_scratch() {
        let mut s = session();
        let Outcome::Edit(specs) = dispatch(&mut s, "vim ghost/a.txt") else {
            panic!("expected edit");
        };
        let mut buffer = dt_editor::EditorBuffer::from_spec(specs.into_iter().next().unwrap());
        buffer.insert(dt_editor::Position::ZERO, "x");
        buffer.save();
        assert!(s.fs.borrow().lookup("ghost").is_none());
    }
}
