//! 用户/会话 JSON 解析器
//!
//! 根节点必须是对象，且包含 `usuarios` 与 `sesiones` 两个数组。
//! 每条记录逐字段校验，所有失败聚合为一条带逐索引原因的错误；
//! 语法层面的 JSON 错误同样以 `Error` 返回。

use super::types::{Session, User, UserActivity};
use super::ParseOutcome;
use serde_json::Value;
use std::path::Path;

/// 解析用户活动 JSON 文件
#[must_use]
pub fn parse(path: &Path) -> ParseOutcome<UserActivity> {
    let contents = match super::read_to_string(path) {
        Ok(c) => c,
        Err(reason) => return ParseOutcome::Error(reason),
    };

    #[cfg(feature = "logging")]
    tracing::debug!("开始解析 JSON 文件: {}", path.display());

    let root: Value = match serde_json::from_str(&contents) {
        Ok(v) => v,
        Err(e) => {
            return ParseOutcome::Error(format!("invalid JSON: {e}"));
        }
    };

    let obj = match root.as_object() {
        Some(o) => o,
        None => {
            return ParseOutcome::Error(
                "JSON validation failed: root is not an object".to_string(),
            );
        }
    };

    let mut reasons: Vec<String> = Vec::new();

    let users = match obj.get("usuarios").and_then(Value::as_array) {
        Some(arr) => parse_users(arr, &mut reasons),
        None => {
            reasons.push("missing 'usuarios' array".to_string());
            Vec::new()
        }
    };

    let sessions = match obj.get("sesiones").and_then(Value::as_array) {
        Some(arr) => parse_sessions(arr, &mut reasons),
        None => {
            reasons.push("missing 'sesiones' array".to_string());
            Vec::new()
        }
    };

    if !reasons.is_empty() {
        #[cfg(feature = "logging")]
        tracing::warn!(
            "JSON 文件 {} 校验失败: {} 个原因",
            path.display(),
            reasons.len()
        );
        return ParseOutcome::Error(format!(
            "JSON validation failed: {}",
            reasons.join("; ")
        ));
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        "JSON 文件 {} 解析完成: {} 个用户, {} 个会话",
        path.display(),
        users.len(),
        sessions.len()
    );

    ParseOutcome::Ok(UserActivity { users, sessions })
}

/// 逐条校验用户数组；失败原因以 `usuarios[i]` 前缀聚合
fn parse_users(arr: &[Value], reasons: &mut Vec<String>) -> Vec<User> {
    let mut users = Vec::with_capacity(arr.len());
    for (idx, item) in arr.iter().enumerate() {
        match parse_user(item) {
            Ok(user) => users.push(user),
            Err(reason) => {
                reasons.push(format!("usuarios[{idx}]: {reason}"));
            }
        }
    }
    users
}

fn parse_user(value: &Value) -> Result<User, String> {
    let obj =
        value.as_object().ok_or_else(|| "not an object".to_string())?;

    let id = obj
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| "missing or non-integer 'id'".to_string())?;
    let name = obj
        .get("nombre")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing or non-string 'nombre'".to_string())?
        .to_string();
    let email = obj
        .get("email")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing or non-string 'email'".to_string())?
        .to_string();
    let active = obj
        .get("activo")
        .and_then(Value::as_bool)
        .ok_or_else(|| "missing or non-boolean 'activo'".to_string())?;

    // ultimo_acceso 可选
    let last_access = obj
        .get("ultimo_acceso")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(User { id, name, email, active, last_access })
}

/// 逐条校验会话数组；失败原因以 `sesiones[i]` 前缀聚合
fn parse_sessions(arr: &[Value], reasons: &mut Vec<String>) -> Vec<Session> {
    let mut sessions = Vec::with_capacity(arr.len());
    for (idx, item) in arr.iter().enumerate() {
        match parse_session(item) {
            Ok(session) => sessions.push(session),
            Err(reason) => {
                reasons.push(format!("sesiones[{idx}]: {reason}"));
            }
        }
    }
    sessions
}

fn parse_session(value: &Value) -> Result<Session, String> {
    let obj =
        value.as_object().ok_or_else(|| "not an object".to_string())?;

    let user_id = obj
        .get("usuario_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| "missing or non-integer 'usuario_id'".to_string())?;

    let start =
        obj.get("inicio").and_then(Value::as_str).map(str::to_string);
    let duration_seconds =
        obj.get("duracion_segundos").and_then(Value::as_i64);
    let pages_visited = obj.get("paginas_visitadas").and_then(Value::as_i64);

    // acciones：缺失或不是列表时收敛为空列表，列表中只保留字符串元素
    let actions = obj
        .get("acciones")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Session { user_id, start, duration_seconds, pages_visited, actions })
}
