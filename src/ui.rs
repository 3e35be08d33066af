use crate::models::Snapshot;

pub fn render_index(snapshot: &Snapshot) -> String {
    let initial = serde_json::to_string(snapshot).unwrap_or_else(|_| "null".to_string());
    // keep the embedded JSON from closing the script tag
    INDEX_HTML.replace("{{INITIAL_STATE}}", &initial.replace("</", "<\\/"))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Creator Orbit</title>
  <style>
    :root {
      --bg: #f4f4f7;
      --ink: #1c1c1e;
      --muted: #8e8e93;
      --card: #ffffff;
      --done: #34c759;
      --accent: #007aff;
      --warm: #ff9500;
      --alarm: #e5372b;
      --shadow: 0 12px 32px rgba(28, 28, 30, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: -apple-system, "PingFang SC", "Helvetica Neue", sans-serif;
      display: flex;
      justify-content: center;
      padding: 24px 12px 96px;
    }

    .app {
      width: min(560px, 100%);
      display: grid;
      gap: 16px;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    h1 {
      margin: 0;
      font-size: 1.4rem;
      font-weight: 800;
    }

    .subtitle {
      margin: 2px 0 0;
      color: var(--muted);
      font-size: 0.75rem;
      letter-spacing: 0.08em;
    }

    .stepper {
      display: flex;
      gap: 6px;
      align-items: center;
    }

    .stepper button,
    .icon-btn {
      border: none;
      background: white;
      border-radius: 999px;
      width: 32px;
      height: 32px;
      cursor: pointer;
      color: var(--muted);
      box-shadow: var(--shadow);
    }

    .card {
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      overflow: hidden;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: center;
      padding: 6px 2px;
      font-size: 0.75rem;
    }

    th.habit, td.habit {
      text-align: left;
      padding-left: 12px;
      font-weight: 700;
      width: 96px;
    }

    th .today {
      color: var(--accent);
    }

    .cell {
      width: 24px;
      height: 24px;
      border: none;
      border-radius: 8px;
      background: #ececf0;
      cursor: pointer;
      color: transparent;
      font-weight: 900;
    }

    .cell.done {
      background: var(--done);
      color: white;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 8px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 12px;
      text-align: center;
      box-shadow: var(--shadow);
    }

    .stat .value {
      font-size: 1.2rem;
      font-weight: 900;
    }

    .stat .label {
      font-size: 0.65rem;
      color: var(--muted);
      letter-spacing: 0.1em;
    }

    .timer {
      width: 100%;
      border: none;
      border-radius: 24px;
      padding: 16px 20px;
      background: var(--ink);
      color: white;
      display: flex;
      justify-content: space-between;
      align-items: center;
      cursor: pointer;
      position: relative;
      overflow: hidden;
    }

    .timer.running {
      background: #d9480f;
    }

    .timer .clock {
      font-family: ui-monospace, monospace;
      font-size: 1.3rem;
      font-weight: 900;
    }

    .timer .bar {
      position: absolute;
      left: 0;
      bottom: 0;
      height: 4px;
      background: rgba(255, 255, 255, 0.4);
    }

    .primary {
      width: 100%;
      border: none;
      border-radius: 20px;
      padding: 16px;
      font-size: 1rem;
      font-weight: 900;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .wall {
      display: grid;
      grid-template-columns: repeat(2, 1fr);
      gap: 12px;
    }

    .wall .card {
      padding: 12px;
    }

    .wall h3 {
      margin: 0 0 8px;
      font-size: 0.7rem;
      color: var(--muted);
    }

    .dots {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 3px;
    }

    .dot {
      aspect-ratio: 1;
      border-radius: 2px;
      background: #ececf0;
    }

    .dot.done {
      background: var(--accent);
    }

    .note-form {
      display: flex;
      gap: 8px;
      padding: 6px;
    }

    .note-form input {
      flex: 1;
      border: none;
      font-size: 0.9rem;
      padding: 10px;
      outline: none;
    }

    .note-form button {
      border: none;
      border-radius: 16px;
      background: var(--ink);
      color: white;
      padding: 0 16px;
      font-size: 1.2rem;
      cursor: pointer;
    }

    .note {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 14px 16px;
    }

    .note h4 {
      margin: 0;
      font-size: 0.9rem;
    }

    .note p {
      margin: 2px 0 0;
      font-size: 0.65rem;
      color: var(--muted);
    }

    .empty {
      text-align: center;
      color: var(--muted);
      padding: 48px 0;
      font-size: 0.8rem;
    }

    nav {
      position: fixed;
      bottom: 0;
      left: 0;
      right: 0;
      display: flex;
      justify-content: center;
      gap: 48px;
      padding: 12px 0 20px;
      background: rgba(255, 255, 255, 0.9);
      backdrop-filter: blur(12px);
      border-top: 1px solid #e5e5ea;
    }

    nav button {
      border: none;
      background: none;
      font-weight: 800;
      color: #c7c7cc;
      cursor: pointer;
    }

    nav button.active {
      color: var(--accent);
    }

    .overlay {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.45);
      display: flex;
      align-items: center;
      justify-content: center;
      padding: 24px;
      z-index: 10;
    }

    .overlay[hidden] {
      display: none;
    }

    .dialog {
      background: white;
      border-radius: 32px;
      padding: 24px;
      width: min(420px, 100%);
      display: grid;
      gap: 16px;
    }

    .options {
      display: grid;
      grid-template-columns: repeat(2, 1fr);
      gap: 8px;
    }

    .option {
      border: 2px solid transparent;
      background: #f2f2f7;
      border-radius: 12px;
      padding: 12px;
      font-weight: 800;
      color: var(--muted);
      cursor: pointer;
    }

    .option.selected {
      background: var(--done);
      color: white;
    }

    .quote {
      min-height: 80px;
      font-weight: 700;
      font-style: italic;
      text-align: center;
      line-height: 1.6;
    }

    .alarm {
      background: var(--alarm);
      color: white;
      flex-direction: column;
      text-align: center;
      gap: 16px;
    }

    .alarm button {
      border: none;
      border-radius: 24px;
      padding: 14px 48px;
      font-size: 1.1rem;
      font-weight: 900;
      color: var(--alarm);
      background: white;
      cursor: pointer;
    }

    .status {
      font-size: 0.8rem;
      color: var(--alarm);
      min-height: 1em;
    }
  </style>
</head>
<body>
  <main class="app" id="app"></main>
  <div class="status" id="status"></div>

  <nav>
    <button type="button" data-tab="weekly">打卡</button>
    <button type="button" data-tab="monthly">月度</button>
    <button type="button" data-tab="notes">成就</button>
  </nav>

  <div class="overlay" id="picker" hidden></div>
  <div class="overlay" id="inspiration" hidden></div>
  <div class="overlay alarm" id="alarm" hidden>
    <h2>专注结束</h2>
    <p>90 分钟的高效产出已达成。请立即离开屏幕，放松身心。</p>
    <button type="button" data-action="dismiss_alarm">收到</button>
  </div>

  <script>
    const appEl = document.getElementById('app');
    const statusEl = document.getElementById('status');
    const pickerEl = document.getElementById('picker');
    const inspirationEl = document.getElementById('inspiration');
    const alarmEl = document.getElementById('alarm');
    const navButtons = Array.from(document.querySelectorAll('nav button'));
    const WEEKDAYS = ['一', '二', '三', '四', '五', '六', '日'];

    let state = {{INITIAL_STATE}};
    let pollTimer = null;
    let alarmShown = false;

    const escapeHtml = (value) =>
      String(value).replace(/[&<>"']/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' }[c]));

    const send = async (action) => {
      const res = await fetch('/api/actions', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(action)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      statusEl.textContent = '';
      state = await res.json();
      render();
    };

    const refresh = async () => {
      const res = await fetch('/api/state');
      if (res.ok) {
        state = await res.json();
        render();
      }
    };

    const dispatch = (action) => send(action).catch((err) => {
      statusEl.textContent = err.message;
    });

    const playAlarm = () => {
      try {
        const audio = new Audio('https://actions.google.com/sounds/v1/alarms/alarm_clock_beep.ogg');
        audio.volume = 0.3;
        audio.play().catch(() => {});
      } catch (e) {}
    };

    const renderWeekly = () => {
      const { week, timer, today } = state;
      const head = week.dates.map((d, i) =>
        `<th><div>${WEEKDAYS[i]}</div><div class="${d === today ? 'today' : ''}">${d.slice(8)}</div></th>`).join('');
      const rows = week.rows.map((row) => {
        const cells = row.done.map((done, i) => {
          const date = week.dates[i];
          const action = row.is_multi
            ? { type: 'open_options', date, habit_id: row.habit_id }
            : { type: 'toggle_habit', date, habit_id: row.habit_id };
          return `<td><button class="cell ${done ? 'done' : ''}" data-send='${escapeHtml(JSON.stringify(action))}'>✓</button></td>`;
        }).join('');
        return `<tr><td class="habit">${escapeHtml(row.name)}</td>${cells}</tr>`;
      }).join('');
      const range = week.dates.length ? `${week.dates[0].replace(/-/g, '.')} — ${week.dates[6].replace(/-/g, '.')}` : '';

      return `
        <header>
          <div class="stepper"><button data-send='{"type":"shift_week","delta":-1}'>‹</button></div>
          <div style="text-align:center">
            <h1>打卡日历</h1>
            <p class="subtitle" data-send='{"type":"reset_week"}'>${range}</p>
          </div>
          <div class="stepper"><button data-send='{"type":"shift_week","delta":1}'>›</button></div>
        </header>
        <section class="card">
          <table>
            <thead><tr><th class="habit">项目</th>${head}</tr></thead>
            <tbody>${rows}</tbody>
          </table>
        </section>
        <section class="stats">
          <div class="stat"><div class="value" style="color:var(--accent)">${week.stats.rate}%</div><div class="label">完成率</div></div>
          <div class="stat"><div class="value" style="color:var(--warm)">${week.stats.perfect_days}</div><div class="label">完美天数</div></div>
          <div class="stat"><div class="value" style="color:var(--done)">${week.stats.total_completed}</div><div class="label">累计达成</div></div>
        </section>
        <button class="timer ${timer.running ? 'running' : ''}" data-send='{"type":"timer_pressed"}'>
          <span>
            <span class="subtitle" style="color:rgba(255,255,255,0.6)">家务90分钟倒计时</span><br />
            <span class="clock">${timer.display}</span>
          </span>
          <span>${timer.running ? '倒计时中' : '开始'}</span>
          ${timer.running ? `<span class="bar" style="width:${(timer.progress * 100).toFixed(2)}%"></span>` : ''}
        </button>
        <button class="primary" data-send='{"type":"request_inspiration"}'>✦ 我是一个创作者</button>
      `;
    };

    const renderMonthly = () => {
      const { month } = state;
      const cards = month.rows.map((row) => `
        <div class="card">
          <h3>${escapeHtml(row.name)} · ${row.completed}</h3>
          <div class="dots">${row.done.map((done, i) => `<div class="dot ${done ? 'done' : ''}" title="${month.days[i]}"></div>`).join('')}</div>
        </div>`).join('');
      return `
        <header>
          <div>
            <h1>坚持之墙</h1>
            <p class="subtitle">月度习惯达成概览</p>
          </div>
          <div class="stepper">
            <button data-send='{"type":"shift_month","delta":-1}'>‹</button>
            <span class="subtitle" data-send='{"type":"reset_month"}'>${month.year} / ${String(month.month).padStart(2, '0')}</span>
            <button data-send='{"type":"shift_month","delta":1}'>›</button>
          </div>
        </header>
        <section class="wall">${cards}</section>
      `;
    };

    const renderNotes = () => {
      const items = state.notes.map((note) => `
        <div class="card note">
          <div><h4>${escapeHtml(note.title)}</h4><p>${escapeHtml(note.date)}</p></div>
          <button class="icon-btn" data-send='${escapeHtml(JSON.stringify({ type: 'delete_note', id: note.id }))}'>✕</button>
        </div>`).join('');
      return `
        <header>
          <div>
            <h1>成就墙</h1>
            <p class="subtitle">记录你的每一个创作突破</p>
          </div>
        </header>
        <form class="card note-form" id="note-form">
          <input id="note-input" type="text" placeholder="今天有哪些高光时刻？" autocomplete="off" />
          <button type="submit">+</button>
        </form>
        ${items || '<div class="empty">暂无成就记录</div>'}
      `;
    };

    const renderPicker = () => {
      const picker = state.picker;
      if (!picker) {
        pickerEl.hidden = true;
        return;
      }
      const options = picker.options.map((o) => {
        const action = { type: 'toggle_option', date: picker.date, habit_id: picker.habit_id, option: o.label };
        return `<button class="option ${o.selected ? 'selected' : ''}" data-send='${escapeHtml(JSON.stringify(action))}'>${escapeHtml(o.label)}</button>`;
      }).join('');
      pickerEl.innerHTML = `
        <div class="dialog">
          <div><h2 style="margin:0">${escapeHtml(picker.habit_name)}</h2><p class="subtitle">${picker.date} · 选择今日已完成项目</p></div>
          <div class="options">${options}</div>
          <button class="primary" style="background:var(--ink)" data-send='{"type":"close_options"}'>更新记录</button>
        </div>`;
      pickerEl.hidden = false;
    };

    const renderInspiration = () => {
      const panel = state.inspiration;
      if (!panel.visible) {
        inspirationEl.hidden = true;
        return;
      }
      const body = panel.loading
        ? '<p class="subtitle">同步 Gemini...</p>'
        : escapeHtml(panel.text || '');
      inspirationEl.innerHTML = `
        <div class="dialog">
          <h2 style="margin:0">创作者灵感</h2>
          <div class="quote">${body}</div>
          <button class="primary" style="background:var(--ink)" data-send='{"type":"dismiss_inspiration"}'>收下灵感</button>
        </div>`;
      inspirationEl.hidden = false;
    };

    const schedulePoll = () => {
      const needsPoll = state.timer.running || state.inspiration.loading;
      if (needsPoll && !pollTimer) {
        pollTimer = setInterval(() => refresh().catch(() => {}), 1000);
      } else if (!needsPoll && pollTimer) {
        clearInterval(pollTimer);
        pollTimer = null;
      }
    };

    const render = () => {
      if (!state) {
        return;
      }
      const focused = document.activeElement && document.activeElement.id === 'note-input'
        ? document.activeElement.value
        : null;

      if (state.tab === 'monthly') {
        appEl.innerHTML = renderMonthly();
      } else if (state.tab === 'notes') {
        appEl.innerHTML = renderNotes();
        const input = document.getElementById('note-input');
        if (focused !== null) {
          input.value = focused;
          input.focus();
        }
      } else {
        appEl.innerHTML = renderWeekly();
      }

      navButtons.forEach((button) => button.classList.toggle('active', button.dataset.tab === state.tab));
      renderPicker();
      renderInspiration();

      if (state.timer.alarm_visible && !alarmShown) {
        playAlarm();
      }
      alarmShown = state.timer.alarm_visible;
      alarmEl.hidden = !state.timer.alarm_visible;
      schedulePoll();
    };

    document.addEventListener('click', (event) => {
      const target = event.target.closest('[data-send]');
      if (target) {
        dispatch(JSON.parse(target.dataset.send));
        return;
      }
      const tab = event.target.closest('[data-tab]');
      if (tab) {
        dispatch({ type: 'select_tab', tab: tab.dataset.tab });
        return;
      }
      const action = event.target.closest('[data-action]');
      if (action) {
        dispatch({ type: action.dataset.action });
      }
    });

    document.addEventListener('submit', (event) => {
      if (event.target.id !== 'note-form') {
        return;
      }
      event.preventDefault();
      const input = document.getElementById('note-input');
      const title = input.value;
      input.value = '';
      dispatch({ type: 'add_note', title });
    });

    render();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::default_habits;
    use crate::models::CheckInRecord;
    use crate::notes::add_note;
    use crate::update::AppModel;
    use crate::view::build_snapshot;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn initial_state_is_embedded_and_script_safe() {
        let mut model = AppModel::new(default_habits(), CheckInRecord::new(), Vec::new());
        add_note(&mut model.notes, "</script><b>x</b>", &Utc::now());
        let snapshot = build_snapshot(&model, NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());

        let html = render_index(&snapshot);
        assert!(!html.contains("{{INITIAL_STATE}}"));
        assert!(html.contains(r#""today":"2026-01-07""#));
        assert!(!html.contains("</script><b>"));
    }
}
