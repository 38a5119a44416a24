//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/export/{artifact}', use [format_endpoint].

/// The dashboard page. The section to show is given by the `section` query parameter.
pub const ROOT: &str = "/";
/// The route for uploading a CSV or Excel file of transactions.
pub const UPLOAD: &str = "/upload";
/// The route for going back to the sample data.
pub const RESET: &str = "/reset";
/// The route for downloading the data as CSV.
pub const EXPORT: &str = "/export/{artifact}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/export/{artifact}', '{artifact}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// `endpoint_path` unchanged.
pub fn format_endpoint(endpoint_path: &str, value: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
