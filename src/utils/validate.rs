use once_cell::sync::Lazy;
use regex::Regex;

static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}[0-9]{3}$").expect("Invalid course code regex"));

static READING_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("Invalid reading url regex"));

static PHOTO_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*(:[0-9]+)?(/\S*)?$")
        .expect("Invalid photo url regex")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_course_code(code: &str) -> Result<(), &'static str> {
    // 三个字母开头，三个数字结尾
    if !COURSE_CODE_RE.is_match(code) {
        return Err("Course code must be three letters followed by three digits");
    }
    Ok(())
}

pub fn validate_reading_url(url: &str) -> Result<(), &'static str> {
    if !READING_URL_RE.is_match(url) {
        return Err("Reading url must start with http:// or https://");
    }
    Ok(())
}

pub fn validate_photo_url(url: &str) -> Result<(), &'static str> {
    if !PHOTO_URL_RE.is_match(url) {
        return Err("Photo url is not a well-formed url");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_code() {
        assert!(validate_course_code("ROR600").is_ok());
        assert!(validate_course_code("abc123").is_ok());
        assert!(validate_course_code("ROR6").is_err());
        assert!(validate_course_code("RO600").is_err());
        assert!(validate_course_code("ROR6000").is_err());
        assert!(validate_course_code("1RO600").is_err());
        assert!(validate_course_code(" ROR600").is_err());
    }

    #[test]
    fn test_reading_url() {
        assert!(validate_reading_url("http://x.com").is_ok());
        assert!(validate_reading_url("https://www.google.com").is_ok());
        assert!(validate_reading_url("www.google.com").is_err());
        assert!(validate_reading_url("ftp://files.example.com").is_err());
        assert!(validate_reading_url("see http://x.com").is_err());
    }

    #[test]
    fn test_photo_url() {
        assert!(validate_photo_url("https://cdn.example.com/u/1.png").is_ok());
        assert!(validate_photo_url("http://localhost:8080/me.jpg").is_ok());
        assert!(validate_photo_url("not a url").is_err());
        assert!(validate_photo_url("https://").is_err());
        assert!(validate_photo_url("https://bad host.com/a.png").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("testing@test.com").is_ok());
        assert!(validate_email("first.last+tag@school.edu").is_ok());
        assert!(validate_email("testing@test").is_err());
        assert!(validate_email("testing.test.com").is_err());
        assert!(validate_email("").is_err());
    }
}
