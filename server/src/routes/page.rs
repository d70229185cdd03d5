//! The demo page
//!
//! A single static page with the upload control, the optional demo-train
//! button and the result display. Styling carries over the PestVision look:
//! green gradient background, centered white card.

use axum::response::Html;

/// GET / - Serve the demo page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>PestVision AI</title>
<style>
  body {
    margin: 0;
    font-family: "Segoe UI", sans-serif;
    background: linear-gradient(180deg, #e8f9ee 0%, #ffffff 100%);
    padding-top: 40px;
  }
  .main-card {
    background: #ffffff;
    border-radius: 25px;
    box-shadow: 0 4px 25px rgba(0,0,0,0.1);
    padding: 50px;
    max-width: 700px;
    margin: auto;
    text-align: center;
  }
  .title {
    font-size: 42px;
    font-weight: 800;
    color: #05652d;
    text-shadow: 1px 1px 2px #cce8d3;
    margin-bottom: 10px;
  }
  .subtitle { font-size: 18px; color: #2b2b2b; margin-bottom: 30px; }
  .bug-icon { font-size: 65px; margin: 15px 0 25px 0; }
  .upload-label { font-size: 22px; font-weight: 700; color: #05652d; margin-bottom: 15px; }
  .note { font-size: 15px; color: #3e3e3e; margin-bottom: 15px; opacity: 0.8; }
  .result { margin-top: 25px; font-size: 20px; }
  .result .label { font-weight: 700; color: #05652d; }
  .error { margin-top: 25px; color: #a33; }
  button {
    margin-top: 20px;
    padding: 10px 24px;
    font-size: 16px;
    border: none;
    border-radius: 10px;
    background: #05652d;
    color: #fff;
    cursor: pointer;
  }
  button:disabled { opacity: 0.5; cursor: wait; }
  .footer {
    text-align: center;
    font-size: 15px;
    color: #1f4628;
    margin-top: 40px;
    line-height: 1.6;
    opacity: 0.85;
  }
</style>
</head>
<body>
<div class="main-card">
  <div class="title">PestVision AI</div>
  <div class="subtitle">Eco-smart Pest Detection powered by Deep Learning</div>
  <div class="bug-icon">&#129442;</div>
  <div class="upload-label">Upload a Pest Image for Detection</div>
  <div class="note">Choose an image file (JPG, JPEG, or PNG)</div>
  <input id="file" type="file" accept="image/jpeg,image/png">
  <div id="result"></div>
  <hr style="margin-top:35px">
  <h3>Optional: Train Demo Model</h3>
  <div class="note">Training uses random demo data; replace with a real dataset for real training.</div>
  <button id="train">Train Demo Model</button>
  <div id="train-result"></div>
</div>
<div class="footer">
  PestVision AI combines the power of deep learning with sustainable farming
  principles to intelligently protect crops.
</div>
<script>
  const fileInput = document.getElementById("file");
  const result = document.getElementById("result");
  const trainButton = document.getElementById("train");
  const trainResult = document.getElementById("train-result");

  fileInput.addEventListener("change", async () => {
    const file = fileInput.files[0];
    if (!file) return;
    result.className = "result";
    result.textContent = "Analyzing image...";

    const form = new FormData();
    form.append("file", file);
    try {
      const response = await fetch("/predict", { method: "POST", body: form });
      if (!response.ok) {
        result.className = "error";
        result.textContent = await response.text();
        return;
      }
      const prediction = await response.json();
      result.innerHTML =
        'Detected Pest: <span class="label">' + prediction.label + "</span><br>" +
        "Confidence: " + prediction.confidence.toFixed(2);
    } catch (err) {
      result.className = "error";
      result.textContent = "Prediction failed: " + err;
    }
  });

  trainButton.addEventListener("click", async () => {
    trainButton.disabled = true;
    trainResult.className = "result";
    trainResult.textContent = "Training with random demo data...";
    try {
      const response = await fetch("/train", { method: "POST" });
      if (!response.ok) {
        trainResult.className = "error";
        trainResult.textContent = await response.text();
        return;
      }
      const report = await response.json();
      const lastLoss = report.epoch_losses[report.epoch_losses.length - 1];
      trainResult.textContent =
        "Demo model trained and saved (" + report.epochs + " epochs, final loss " +
        lastLoss.toFixed(4) + ")";
    } catch (err) {
      trainResult.className = "error";
      trainResult.textContent = "Training failed: " + err;
    } finally {
      trainButton.disabled = false;
    }
  });
</script>
</body>
</html>
"#;
