/// Strips `-----BEGIN ...-----` / `-----END ...-----` lines from a PEM file so
/// its contents can be passed where a bare body is expected.
pub(crate) fn body_from_file_contents(contents: &str) -> String {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_marker(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_marker(line: &str) -> bool {
    line.starts_with("-----BEGIN ") || line.starts_with("-----END ")
}
