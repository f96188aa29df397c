//! Embedded chat page served at `/`.
//!
//! A single self-contained HTML document, no build step and no static
//! file directory to deploy. Talks to the JSON API with `fetch`.

/// The complete chat page.
pub fn chat_html() -> &'static str {
    CHAT_HTML
}

const CHAT_HTML: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme="dark">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>CoursePilot — Course Materials Assistant</title>
<style>
  :root[data-theme="dark"] {
    --bg: #0f1117; --panel: #181b25; --border: #2a2f3e;
    --text: #e6e8ee; --muted: #8b91a5; --accent: #6c8cff;
    --user-bubble: #2b3a67; --bot-bubble: #1e2230;
  }
  :root[data-theme="light"] {
    --bg: #f5f6fa; --panel: #ffffff; --border: #d9dce6;
    --text: #1c1f2b; --muted: #5d6478; --accent: #3b5bdb;
    --user-bubble: #dce4ff; --bot-bubble: #eef0f6;
  }
  * { box-sizing: border-box; margin: 0; }
  body {
    background: var(--bg); color: var(--text);
    font-family: system-ui, -apple-system, sans-serif;
    display: flex; height: 100vh;
  }
  aside {
    width: 280px; background: var(--panel); border-right: 1px solid var(--border);
    padding: 1.2rem; overflow-y: auto; flex-shrink: 0;
  }
  aside h1 { font-size: 1.1rem; margin-bottom: 1rem; }
  aside h2 { font-size: 0.8rem; color: var(--muted); text-transform: uppercase; margin: 1rem 0 .5rem; }
  #course-stats { font-size: .9rem; }
  #course-titles li { margin: .3rem 0 .3rem 1rem; font-size: .85rem; }
  .suggested { display: block; width: 100%; text-align: left; margin: .3rem 0;
    padding: .5rem; border: 1px solid var(--border); border-radius: 6px;
    background: none; color: var(--text); cursor: pointer; font-size: .85rem; }
  .suggested:hover { border-color: var(--accent); }
  main { flex: 1; display: flex; flex-direction: column; }
  header { display: flex; justify-content: space-between; align-items: center;
    padding: .8rem 1.2rem; border-bottom: 1px solid var(--border); background: var(--panel); }
  #theme-toggle { background: none; border: 1px solid var(--border); border-radius: 6px;
    color: var(--text); padding: .4rem .7rem; cursor: pointer; }
  #chat { flex: 1; overflow-y: auto; padding: 1.2rem; }
  .msg { max-width: 75%; margin: .5rem 0; padding: .7rem 1rem; border-radius: 10px;
    white-space: pre-wrap; line-height: 1.45; }
  .msg.user { background: var(--user-bubble); margin-left: auto; }
  .msg.bot { background: var(--bot-bubble); }
  .sources { margin-top: .5rem; font-size: .8rem; color: var(--muted); }
  .sources summary { cursor: pointer; }
  form { display: flex; gap: .6rem; padding: 1rem 1.2rem; border-top: 1px solid var(--border);
    background: var(--panel); }
  input[type=text] { flex: 1; padding: .7rem; border: 1px solid var(--border);
    border-radius: 8px; background: var(--bg); color: var(--text); font-size: 1rem; }
  button[type=submit] { padding: .7rem 1.4rem; border: none; border-radius: 8px;
    background: var(--accent); color: #fff; font-size: 1rem; cursor: pointer; }
  button[type=submit]:disabled { opacity: .5; cursor: wait; }
</style>
</head>
<body>
<aside>
  <h1>CoursePilot</h1>
  <h2>Courses</h2>
  <div id="course-stats">Loading…</div>
  <ul id="course-titles"></ul>
  <h2>Try asking</h2>
  <button class="suggested">What courses are available?</button>
  <button class="suggested">What is covered in lesson 1?</button>
  <button class="suggested">Give me the outline of a course</button>
</aside>
<main>
  <header>
    <div>Course Materials Assistant</div>
    <button id="theme-toggle" title="Toggle theme">&#9788;</button>
  </header>
  <div id="chat"></div>
  <form id="query-form">
    <input type="text" id="query" placeholder="Ask about the course materials…" autocomplete="off">
    <button type="submit" id="send">Send</button>
  </form>
</main>
<script>
  let sessionId = null;
  const chat = document.getElementById('chat');
  const form = document.getElementById('query-form');
  const input = document.getElementById('query');
  const send = document.getElementById('send');

  // Theme: persisted per browser.
  const root = document.documentElement;
  root.dataset.theme = localStorage.getItem('theme') || 'dark';
  document.getElementById('theme-toggle').addEventListener('click', () => {
    root.dataset.theme = root.dataset.theme === 'dark' ? 'light' : 'dark';
    localStorage.setItem('theme', root.dataset.theme);
  });

  function addMessage(text, who, sources) {
    const div = document.createElement('div');
    div.className = 'msg ' + who;
    div.textContent = text;
    if (sources && sources.length) {
      const details = document.createElement('details');
      details.className = 'sources';
      const summary = document.createElement('summary');
      summary.textContent = 'Sources (' + sources.length + ')';
      details.appendChild(summary);
      const list = document.createElement('div');
      list.textContent = sources.join(', ');
      details.appendChild(list);
      div.appendChild(details);
    }
    chat.appendChild(div);
    chat.scrollTop = chat.scrollHeight;
  }

  async function ask(question) {
    addMessage(question, 'user');
    input.value = '';
    send.disabled = true;
    try {
      const resp = await fetch('/api/query', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ query: question, session_id: sessionId }),
      });
      const data = await resp.json();
      if (!resp.ok) throw new Error(data.error || resp.statusText);
      sessionId = data.session_id;
      addMessage(data.answer, 'bot', data.sources);
    } catch (e) {
      addMessage('Error: ' + e.message, 'bot');
    } finally {
      send.disabled = false;
      input.focus();
    }
  }

  form.addEventListener('submit', (e) => {
    e.preventDefault();
    const q = input.value.trim();
    if (q) ask(q);
  });

  document.querySelectorAll('.suggested').forEach((btn) => {
    btn.addEventListener('click', () => ask(btn.textContent));
  });

  async function loadCourses() {
    try {
      const resp = await fetch('/api/courses');
      const data = await resp.json();
      document.getElementById('course-stats').textContent =
        data.total_courses + ' course(s) loaded';
      const ul = document.getElementById('course-titles');
      ul.innerHTML = '';
      for (const title of data.course_titles) {
        const li = document.createElement('li');
        li.textContent = title;
        ul.appendChild(li);
      }
    } catch (e) {
      document.getElementById('course-stats').textContent = 'Courses unavailable';
    }
  }
  loadCourses();
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_html_is_complete_document() {
        let html = chat_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("/api/query"));
        assert!(html.contains("/api/courses"));
        assert!(html.contains("theme-toggle"));
    }
}
