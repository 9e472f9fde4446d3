//! Server-rendered HTML pages

use crate::models::{Invite, Upload, User};

/// Escape text for inclusion in HTML
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | image Storage</title>
<link rel="stylesheet" href="/static/style.css">
<script src="/static/app.js" defer></script>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

fn nav(is_admin: bool) -> String {
    let admin = if is_admin {
        r#" | <a href="/admin">Админка</a>"#
    } else {
        ""
    };
    format!(
        r#"<nav><a href="/">Главная</a> | <a href="/uploads">Мои загрузки</a>{admin} | <a href="/api/uploads/create">Конфиг ShareX</a> | <a href="/logout">Выход</a></nav>"#
    )
}

/// Error page; `message_html` is inserted verbatim
pub fn error_page(code: u16, message_html: &str) -> String {
    layout(
        &format!("Ошибка {code}"),
        &format!("<main><h1>{code}</h1><p>{message_html}</p></main>"),
    )
}

pub fn login_page() -> String {
    layout(
        "Вход",
        r#"<main>
<h1>Вход</h1>
<p id="frontAlert"></p>
<input id="username" placeholder="Имя пользователя">
<input id="password" type="password" placeholder="Пароль">
<button onclick="login()">Войти</button>
<p><a href="/register">Регистрация</a></p>
</main>"#,
    )
}

pub fn register_page() -> String {
    layout(
        "Регистрация",
        r#"<main>
<h1>Регистрация</h1>
<p id="frontAlert"></p>
<input id="username" placeholder="Имя пользователя">
<input id="password" type="password" placeholder="Пароль">
<input id="code" placeholder="Инвайт-код">
<button onclick="register()">Зарегистрироваться</button>
<p><a href="/login">Вход</a></p>
</main>"#,
    )
}

pub fn index_page(user: Option<&User>, is_admin: bool) -> String {
    let greeting = match user {
        Some(user) => format!("Привет, {}!", escape(&user.username)),
        None => "Привет!".to_string(),
    };
    layout(
        "Главная",
        &format!(
            r#"{nav}
<main>
<h1>{greeting}</h1>
<p>Загружайте изображения через ShareX или форму ниже.</p>
<form action="/api/uploads/create" method="post" enctype="multipart/form-data">
<input type="file" name="image" accept="image/*">
<button type="submit">Загрузить</button>
</form>
</main>"#,
            nav = nav(is_admin),
        ),
    )
}

fn upload_rows(uploads: &[Upload], host: &str, with_delete: bool) -> String {
    uploads
        .iter()
        .map(|upload| {
            let code = escape(&upload.code);
            let delete = if with_delete {
                format!(
                    r#" <button onclick="deleteFile({id})">Удалить</button>"#,
                    id = upload.id
                )
            } else {
                String::new()
            };
            format!(
                r#"<li id="file-{id}"><a href="{host}/uploads/{code}">{code}</a>{delete}</li>"#,
                id = upload.id,
                host = escape(host.trim_end_matches('/')),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn uploads_page(uploads: &[Upload], host: &str, is_admin: bool) -> String {
    let body = if uploads.is_empty() {
        "<p>Загрузок пока нет.</p>".to_string()
    } else {
        format!("<ul>\n{}\n</ul>", upload_rows(uploads, host, true))
    };
    layout(
        "Мои загрузки",
        &format!(
            "{nav}\n<main>\n<h1>Мои загрузки</h1>\n{body}\n</main>",
            nav = nav(is_admin)
        ),
    )
}

pub fn admin_page(users: &[User], uploads: &[Upload], invites: &[Invite], host: &str) -> String {
    let user_rows = users
        .iter()
        .map(|user| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                user.id,
                escape(&user.username),
                if user.is_admin { "да" } else { "нет" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let invite_rows = invites
        .iter()
        .map(|invite| {
            let code = escape(&invite.code);
            format!(
                r#"<tr id="invite-{code}"><td>{code}</td><td>{uses}</td><td><button data-code="{code}" onclick="deleteInvite(this.dataset.code)">Удалить</button></td></tr>"#,
                uses = invite.uses
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    layout(
        "Админка",
        &format!(
            r#"{nav}
<main>
<h1>Пользователи</h1>
<table><tr><th>ID</th><th>Имя</th><th>Админ</th></tr>
{user_rows}
</table>
<h1>Инвайт-коды</h1>
<button onclick="createInvite()">Создать</button> <button onclick="truncateInvites()">Очистить</button>
<table><tr><th>Код</th><th>Использований</th><th></th></tr>
{invite_rows}
</table>
<h1>Загрузки</h1>
<ul>
{upload_rows}
</ul>
</main>"#,
            nav = nav(true),
            upload_rows = upload_rows(uploads, host, false),
        ),
    )
}
