use std::fs;
use std::path::Path;

use clap::CommandFactory;

// The command tree is shared with the binary; accessors it defines for
// runtime use are unused here.
#[allow(dead_code)]
#[path = "src/cli.rs"]
mod cli;

/// Renders `commdash.1` plus one page per visible subcommand at every depth
/// (`commdash-table-export.1`) into `$OUT_DIR/man`.
fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir).expect("create man page directory");

    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let page = cmd.get_name().to_owned();
        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{page}-{}", sub.get_name()))),
        );
        write_page(cmd, &man_dir.join(format!("{page}.1")));
    }
}

fn write_page(cmd: clap::Command, path: &Path) {
    let mut roff = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut roff)
        .unwrap_or_else(|e| panic!("render {}: {e}", path.display()));
    fs::write(path, roff).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}
