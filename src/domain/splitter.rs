//! 文本分段
//!
//! 把清洗后的文本切成有序的、不超过字符预算的片段，
//! 供下游逐段送往合成服务。切分只发生在词边界上。

/// 有序文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 片段在原文中的序号，拼接顺序以它为准
    pub index: usize,
    /// 片段文本，两端无空白
    pub text: String,
}

/// 按词边界贪心分段
///
/// 按空白分词后逐词累积当前片段，当 `当前长度 + 下一词长度` 达到
/// `max_len` 时关闭当前片段、以溢出词开启新片段。
///
/// 边界约定:
/// - 单个长度超过 `max_len` 的词不再细分，独立成一个超长片段
/// - 非空输入至少产生一个片段（纯空白输入产生一个空片段）
/// - 相同输入和预算永远产生相同的片段序列
pub fn split(text: &str, max_len: usize) -> Vec<Segment> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for token in text.split_whitespace() {
        if current.is_empty() {
            if token.len() >= max_len {
                // 超长词独立成段，不截断
                chunks.push(token.to_string());
            } else {
                current.push_str(token);
            }
            continue;
        }

        // +1 是拼接用的空格
        if current.len() + 1 + token.len() < max_len {
            current.push(' ');
            current.push_str(token);
        } else {
            chunks.push(std::mem::take(&mut current));
            if token.len() >= max_len {
                chunks.push(token.to_string());
            } else {
                current.push_str(token);
            }
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        // 非空输入保证至少一个片段
        if !text.is_empty() {
            chunks.push(current);
        }
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, text)| Segment { index, text })
        .collect()
}
