//! Path checks for image destinations.

use super::ImageError;

/// Whether `path` is absolute: a `/` or `X:/` root, optionally behind `scheme://` wrappers.
pub fn is_absolute_path(path: &str) -> Result<bool, ImageError> {
    if path.is_empty() || !path.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
        return Err(ImageError::NonPrintablePath(path.escape_default().to_string()));
    }

    // a wrapper needs at least two characters in front of its `://`
    let rest = match path.rfind("://") {
        Some(at) if at >= 2 => &path[at + 3..],
        _ => path,
    };

    let mut chars = rest.chars();
    Ok(match (chars.next(), chars.next(), chars.next()) {
        (Some('/'), _, _) => true,
        (Some(drive), Some(':'), Some('/')) => drive.is_ascii_alphabetic(),
        _ => false,
    })
}

/// Collapses runs of `/` into one, except right after a `:` (as in `https://`).
pub fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous: Option<char> = None;
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '/' {
            out.push(c);
            previous = Some(c);
            continue;
        }
        let mut run = 1;
        while chars.peek() == Some(&'/') {
            chars.next();
            run += 1;
        }
        let keep = match previous {
            Some(':') => run,
            Some(_) => 1,
            // a leading run only collapses when a slash can stand in for the preceding character
            None if run >= 3 => 2,
            None => run,
        };
        out.extend(std::iter::repeat('/').take(keep));
        previous = Some('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_paths() {
        assert!(is_absolute_path("/var/www/public/uploads/").unwrap());
        assert!(is_absolute_path("C:/Users/public/").unwrap());
        assert!(is_absolute_path("file:///var/www/").unwrap());
        assert!(is_absolute_path("phar://zip://C:/archive/").unwrap());
        assert!(!is_absolute_path("uploads/posts/").unwrap());
        assert!(!is_absolute_path("1:/nope").unwrap());
        assert!(!is_absolute_path("s3://bucket/key").unwrap());
        // the root has to follow the last wrapper
        assert!(!is_absolute_path("/var/www/a://b").unwrap());
        assert!(is_absolute_path("/var/www/a:///b").unwrap());
    }

    #[test]
    fn test_non_printable_paths_are_rejected() {
        assert!(matches!(
            is_absolute_path(""),
            Err(ImageError::NonPrintablePath(_))
        ));
        assert!(matches!(
            is_absolute_path("/tmp/\nimages"),
            Err(ImageError::NonPrintablePath(_))
        ));
        assert!(matches!(
            is_absolute_path("/tmp/bilder/ä"),
            Err(ImageError::NonPrintablePath(_))
        ));
    }

    #[test]
    fn test_collapse_slashes() {
        assert_eq!(collapse_slashes("public//uploads///a.png"), "public/uploads/a.png");
        assert_eq!(collapse_slashes("http://host//x"), "http://host/x");
        assert_eq!(collapse_slashes("/srv/www/"), "/srv/www/");
        assert_eq!(collapse_slashes("//share"), "//share");
    }
}
