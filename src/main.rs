use std::process;

fn main() {
    if !pdfbind::run() {
        process::exit(1);
    }
}
