pub trait WithNoticeExt {
    fn with_notice(&self, notice: Option<&str>) -> String;
}

impl<T> WithNoticeExt for T
where
    T: ToString,
{
    fn with_notice(&self, notice: Option<&str>) -> String {
        match notice {
            Some(notice) if !notice.is_empty() => format!("{}\n{}", self.to_string(), notice),
            _ => self.to_string(),
        }
    }
}
