//! 文本清洗
//!
//! 在分段之前做两件事:
//! 1. 剥离 `<...>` 标记，请求体可能是带 HTML 标签的富文本
//! 2. 给缺少空格的句点补一个空格，后续按空白分词时句子不会被粘连

/// 清洗原始文本
///
/// 空输入返回空字符串，由上游拒绝空请求
pub fn normalize(raw: &str) -> String {
    respace_periods(&strip_tags(raw))
}

/// 剥离标记标签
///
/// 单次扫描，`<` 到 `>` 之间的内容全部丢弃；
/// 未闭合的标签吞掉到末尾
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;

    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    out
}

/// 句点后补空格
///
/// "a.b" 会在分词后变成一个词，合成时被读成粘连的假词；
/// 句点后已有空白则不重复插入
fn respace_periods(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == '.' {
            match chars.peek() {
                Some(next) if !next.is_whitespace() => out.push(' '),
                _ => {}
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markup() {
        assert_eq!(normalize("<p>hello <b>world</b></p>"), "hello world");
    }

    #[test]
    fn test_respaces_periods() {
        assert_eq!(normalize("one.two. three"), "one. two. three");
    }

    #[test]
    fn test_period_at_end_gets_no_trailing_space() {
        assert_eq!(normalize("done."), "done.");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_unterminated_tag_swallowed() {
        assert_eq!(normalize("before<a href=after"), "before");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(normalize("just plain words"), "just plain words");
    }

    #[test]
    fn test_tag_with_attributes() {
        assert_eq!(
            normalize(r#"<audio src="x.mp3" controls>fallback</audio>"#),
            "fallback"
        );
    }
}
