//! 查询增强辅助函数
//!
//! 纯函数：把一个范围编码进 SQL 片段，所有 id 走参数绑定，
//! 不做任何字符串插值。

use super::set::ScopeSet;

/// 带位置参数的 SQL 片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedSql {
    pub sql: String,
    pub params: Vec<i64>,
}

impl ScopedSql {
    /// 下一个可用的位置参数编号（$n）
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }
}

/// 把范围追加到已有 WHERE 子句的查询上。
///
/// `base` 必须已经带 WHERE 子句（控制器惯用 `WHERE 1 = 1` 起头），
/// `params` 中已有的参数占用 `$1..$params.len()`。
///
/// - `Unrestricted`：原样返回，不过滤。
/// - `Empty`：追加恒假谓词 `1 = 0`，保证零行而不产生非法的空 `IN ()`。
/// - `Restricted`：追加 `column IN ($n, ...)` 并扩展参数列表。
pub fn restrict(base: &str, params: Vec<i64>, scope: &ScopeSet, column: &str) -> ScopedSql {
    match scope {
        ScopeSet::Unrestricted => ScopedSql {
            sql: base.to_string(),
            params,
        },
        ScopeSet::Empty => ScopedSql {
            sql: format!("{base} AND 1 = 0"),
            params,
        },
        ScopeSet::Restricted(ids) => {
            let mut params = params;
            let start = params.len() + 1;
            let placeholders: Vec<String> = (start..start + ids.len())
                .map(|n| format!("${n}"))
                .collect();
            params.extend(ids.iter().copied());

            ScopedSql {
                sql: format!("{base} AND {column} IN ({})", placeholders.join(", ")),
                params,
            }
        }
    }
}
