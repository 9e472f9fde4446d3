//! User-facing messages returned by the API and pages

pub const EMPTY_FORM: &str = "Форма пуста.";
pub const USER_NOT_FOUND: &str = "Пользователя с такими данными не существует.";
pub const WRONG_PASSWORD: &str = "Неверный пароль.";
pub const LOGIN_OK: &str = "Успешная авторизация!";
pub const INVALID_INVITE: &str = "Недействительный инвайт-код.";
pub const USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует.";
pub const REGISTER_OK: &str = "Успешная регистрация!";

pub const FILE_UPLOADED: &str = "Файл загружен.";
pub const UPLOAD_FAILED: &str = "Ошибка при загрузке файла | Multer";
/// Any upload failure other than a malformed or oversized body, including a refused type
pub const UPLOAD_FAILED_UNKNOWN: &str = "Ошибка при загрузке файла | Неизвестно";
pub const NO_FILE: &str = "Файл не передан.";
pub const UPLOADS_LISTED: &str = "Вот список всех ваших загрузок.";
pub const MISSING_FILE_ID: &str = "Не указан ID файла";
pub const UNKNOWN_FILE_ID: &str = "Файла с таким ID не существует.";
pub const FILE_DELETED: &str = "Файл удалён.";
pub const UPLOADS_TRUNCATED: &str = "Все ваши файлы были удалены.";

pub const ADMIN_REQUIRED: &str = "Вы не обладаете привилегиями администратора.";
pub const INVITES_LISTED: &str = "Вот список всех инвайт-кодов.";
pub const INVITE_CREATED: &str = "Инвайт-код создан.";
pub const MISSING_INVITE_CODE: &str = "Не указан инвайт-код.";
pub const INVITE_DELETED: &str = "Инвайт-код удалён.";
pub const INVITES_TRUNCATED: &str = "Все инвайт-коды удалены.";

pub const PAGE_FORBIDDEN: &str = "Доступ к данной странице ограничен.";
pub const IMAGE_NOT_FOUND: &str = "Изображение не найдено.";
pub const PAGE_NOT_FOUND: &str = "Страница не найдена.";
pub const INTERNAL_ERROR: &str = "Внутренняя ошибка сервера.";
pub const SESSION_ERROR: &str = "Ошибка сессии";
