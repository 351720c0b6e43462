use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a source is paginated; the message carries the running record count.
pub fn create_harvest_spinner(source: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {prefix}: {msg}")
            .expect("Failed to create progress style")
    );
    pb.set_prefix(source.to_string());
    pb.set_message("requesting first page");
    pb
}
