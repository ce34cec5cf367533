//! Built-in templates and code descriptions.

/// HTML template used when none is configured.
pub const DEFAULT_TEMPLATE_NAME: &str = "ghost";

pub const JSON_FORMAT: &str = r#"{
  "error": true,
  "code": {{ code | tojson }},
  "message": {{ message | tojson }},
  "description": {{ description | tojson }}{% if show_details %},
  "details": {
    "host": {{ host | tojson }},
    "request_id": {{ request_id | tojson }},
    "timestamp": {{ now_unix() }}
  }{% endif %}
}"#;

pub const XML_FORMAT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<error>
  <code>{{ code }}</code>
  <message>{{ message | e }}</message>
  <description>{{ description | e }}</description>{% if show_details %}
  <details>
    <host>{{ host | e }}</host>
    <requestID>{{ request_id | e }}</requestID>
    <timestamp>{{ now_unix() }}</timestamp>
  </details>{% endif %}
</error>"#;

pub const PLAIN_TEXT_FORMAT: &str = r#"Error {{ code }}: {{ message }}{% if description %}
{{ description }}{% endif %}{% if show_details %}

Host: {{ host }}
Request ID: {{ request_id }}
Timestamp: {{ now_unix() }}{% endif %}"#;

pub const GHOST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="robots" content="noindex, nofollow">
  <title>{{ code }}: {{ message | e }}</title>
  <style>
    body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
           font-family: system-ui, sans-serif; background: #f7f7f7; color: #333; }
    main { text-align: center; }
    h1 { font-size: 6rem; margin: 0; color: #bbb; }
    footer { margin-top: 2rem; font-size: .8rem; color: #999; }
  </style>
</head>
<body>
  <!-- ghost -->
  <main>
    <h1>{{ code }}</h1>
    <h2>{{ message | e }}</h2>
    <p>{{ description | e }}</p>
    {% if show_details %}
    <footer>
      <div>Host: {{ host | e }}</div>
      <div>Request ID: {{ request_id | e }}</div>
      <div>Timestamp: {{ now() }}</div>
    </footer>
    {% endif %}
  </main>
</body>
</html>"#;

pub const TERMINAL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="robots" content="noindex, nofollow">
  <title>{{ code }}: {{ message | e }}</title>
  <style>
    body { margin: 0; padding: 2rem; background: #111; color: #3f3; font-family: monospace; }
  </style>
</head>
<body>
  <!-- terminal -->
<pre>
$ curl -I {{ host | e }}
HTTP/1.1 {{ code }} {{ message | e }}

# {{ description | e }}{% if show_details %}
# request id: {{ request_id | e }}
# time: {{ now() }}{% endif %}
</pre>
</body>
</html>"#;

/// (code, message, description)
pub const CODES: &[(&str, &str, &str)] = &[
    ("400", "Bad Request", "The server did not understand the request"),
    ("401", "Unauthorized", "The requested page needs a username and a password"),
    ("403", "Forbidden", "Access is forbidden to the requested page"),
    ("404", "Not Found", "The server can not find the requested page"),
    ("405", "Method Not Allowed", "The method specified in the request is not allowed"),
    ("407", "Proxy Authentication Required", "You must authenticate with a proxy server before this request can be served"),
    ("408", "Request Timeout", "The request took longer than the server was prepared to wait"),
    ("409", "Conflict", "The request could not be completed because of a conflict"),
    ("410", "Gone", "The requested page is no longer available"),
    ("411", "Length Required", "The \"Content-Length\" is not defined. The server will not accept the request without it"),
    ("412", "Precondition Failed", "The pre condition given in the request evaluated to false by the server"),
    ("413", "Payload Too Large", "The server will not accept the request, because the request entity is too large"),
    ("416", "Requested Range Not Satisfiable", "The requested byte range is not available and is out of bounds"),
    ("418", "I'm a teapot", "Attempt to brew coffee with a teapot is not supported"),
    ("429", "Too Many Requests", "Too many requests in a given amount of time"),
    ("500", "Internal Server Error", "The server met an unexpected condition"),
    ("502", "Bad Gateway", "The server received an invalid response from the upstream server"),
    ("503", "Service Unavailable", "The server is temporarily overloading or down"),
    ("504", "Gateway Timeout", "The gateway has timed out"),
    ("505", "HTTP Version Not Supported", "The server does not support the \"http protocol\" version"),
];
